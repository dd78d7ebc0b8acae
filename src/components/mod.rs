pub mod evidence_graph;
