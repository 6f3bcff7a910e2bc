#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;
pub mod settings;

use Examples::kinetics_examples::kin_examples;
use Utils::logger::init_logger;
use log::{LevelFilter, error};

pub fn main() {
    if let Err(e) = init_logger(LevelFilter::Info, None) {
        eprintln!("{}", e);
    }
    //
    let task: usize = 1;
    if let Err(e) = kin_examples(task) {
        error!("example {} failed: {}", task, e);
    }
}
