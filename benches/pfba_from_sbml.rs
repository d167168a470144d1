use criterion::{criterion_group, criterion_main, Criterion};

extern crate diel_qy;

use diel_qy::configuration::Configuration;
use diel_qy::flux_analysis::pfba;
use diel_qy::quantum_yield::ModelVariant;
use diel_qy::ModelLp;
use good_lp::default_solver;

use std::str::FromStr;

fn read_toy() {
    let file_str = include_str!("../tests/data/diel_toy.xml");
    ModelLp::from_str(file_str).unwrap();
}

fn optimize_toy() {
    let file_str = include_str!("../tests/data/diel_toy.xml");
    let mut model = ModelLp::from_str(file_str).unwrap();
    ModelVariant::diel().configure(&mut model).unwrap();
    pfba(&model, default_solver, &Configuration::default()).unwrap();
}

fn create_lp_benchmark(c: &mut Criterion) {
    c.bench_function("Read diel toy model", |b| b.iter(read_toy));
}

fn optimize_benchmark(c: &mut Criterion) {
    c.bench_function("pFBA diel toy model", |b| b.iter(optimize_toy));
}

criterion_group!(benches, optimize_benchmark, create_lp_benchmark);
criterion_main!(benches);
