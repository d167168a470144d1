use diel_qy::configuration::Configuration;
use diel_qy::quantum_yield::{run, QuantumYieldSetup};
use good_lp::default_solver;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const LOG_CONFIG: &str = "log4rs.yml";

/// Logging from `log4rs.yml` when present, otherwise `info` and above to stderr.
fn init_logging() {
    if log4rs::init_file(LOG_CONFIG, Default::default()).is_ok() {
        return;
    }
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {l} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info));
    if let Ok(config) = config {
        let _ = log4rs::init_config(config);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let setup = QuantumYieldSetup::default();
    let table = run(&setup, &Configuration::default(), default_solver)?;
    table.to_csv(&setup.output)?;
    println!("{}", table);
    Ok(())
}
