pub mod auto_eval;
