/// hydrogen/oxygen demonstration of the kinetics engine
pub mod kinetics_examples;
