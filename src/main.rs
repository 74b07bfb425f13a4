use protocheck::pingpong::{self, Server};
use protocheck::{find_path, print_path, Checker, CheckerConfig, CheckerError, SearchResult, Trace};

const GOAL: u32 = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => CheckerConfig::from_file(path)?,
        None => CheckerConfig::from_env()?,
    };
    protocheck::observability::init_tracing(config.json_logs)?;

    println!("=== Ping-pong model check ===\n");
    println!("Configuration:");
    println!("  strategy:        {}", config.strategy);
    println!(
        "  max depth:       {}",
        config.max_depth.map_or_else(|| "unlimited".to_string(), |d| d.to_string())
    );
    println!("  seed:            {}", config.seed);
    println!("  drop off:        {}", config.allow_drop_off);
    println!("  duplicate:       {}", config.allow_duplicate);
    println!();

    let checker = Checker::new(config)?;

    for (name, server) in [
        ("reliable server", Server::new(false, false)),
        ("unstable server", Server::new(true, false)),
        ("crazy server", Server::new(false, true)),
    ] {
        println!("--- {} ---", name);
        let root = pingpong::model(
            checker.config().allow_drop_off,
            checker.config().allow_duplicate,
            server,
            GOAL,
        );
        let result = checker.run(root, pingpong::invariant, pingpong::is_final);
        report(&result)?;
        println!();
    }

    Ok(())
}

fn report(result: &SearchResult) -> Result<(), CheckerError> {
    println!("{}", result.summary());

    let Some(state) = result.invalidate.as_ref().or_else(|| result.targets.last()) else {
        return Ok(());
    };

    if result.is_violation() {
        println!("Counterexample:");
    } else {
        println!("Trace to goal:");
    }
    let (_, path) = find_path(state);
    print_path(&path);

    if std::env::var("PROTOCHECK_TRACE_JSON").is_ok_and(|v| v == "1") {
        println!("{}", Trace::from_path(&path).to_json()?);
    }
    Ok(())
}
