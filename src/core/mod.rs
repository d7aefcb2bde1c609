pub mod assembler;
pub mod config;
pub mod document;
pub mod phoneme_map;
pub mod pipeline;
pub mod timeline;
pub mod transitions;
