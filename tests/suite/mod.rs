mod config;
mod grid;
mod orchestrator;
mod permutation;
mod risk;
mod sequence;
