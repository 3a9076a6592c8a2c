use katana_bench::args::{Command, print_help};
use katana_bench::benchmark::BenchmarkRegistry;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    katana_bench::logging::init("info");

    let command = match Command::parse() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("❌ {}", e);
            print_help();
            return ExitCode::FAILURE;
        }
    };

    let registry = BenchmarkRegistry::with_builtin();

    match command {
        Command::Help => print_help(),
        Command::Version => println!(
            "Katana Bench v{} ({})",
            env!("KATANA_VERSION_DISPLAY"),
            env!("KATANA_BUILD_YEAR")
        ),
        Command::List => {
            print_banner();
            print_games(&registry.get_available());
        }
        Command::Run {
            game,
            runs,
            cooldown,
        } => {
            print_banner();
            if let Err(e) = run(&registry, game, runs, cooldown) {
                log::error!("❌ Error during benchmark execution: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn run(
    registry: &BenchmarkRegistry,
    game: Option<String>,
    runs: Option<u32>,
    cooldown: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let available = registry.get_available();
    if available.is_empty() {
        return Err("No game benchmark implementations found".into());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let game = match game {
        Some(game) => game,
        None => prompt_for_game(&mut input, &available)?,
    };
    println!("\n🎮 Selected game: {}", game);

    let mut benchmark = registry.create(&game)?;

    let runs = match runs.or(benchmark.config().default_runs) {
        Some(runs) => {
            println!("📌 Runs: {}", runs);
            runs
        }
        None => prompt_number(&mut input, "📝 Enter number of benchmark runs: ", |n: u32| {
            (n > 0).then_some(n).ok_or("Number of runs must be greater than 0.")
        })?,
    };

    let cooldown = match cooldown.or(benchmark.config().cooldown) {
        Some(secs) => {
            println!("📌 Cooldown: {}s", secs);
            secs
        }
        None => prompt_number(
            &mut input,
            "🕒 Enter cooldown between runs (seconds): ",
            |secs: u64| Ok(secs),
        )?,
    };

    println!("\n⚙️ Benchmark configuration:");
    println!("  - Game: {}", benchmark.game_name());
    println!("  - Runs: {}", runs);
    println!("  - Cooldown: {}s", cooldown);
    println!("\n🚀 Starting benchmark series...");

    let records = benchmark.run_benchmark_series(runs, Duration::from_secs(cooldown))?;

    println!("\n✅ Benchmark completed successfully!");
    for record in &records {
        println!(
            "  - Run {}: {:.1}s",
            record.run,
            record.duration.as_secs_f32()
        );
    }
    Ok(())
}

fn print_banner() {
    println!();
    println!(" ██╗  ██╗ █████╗ ████████╗ █████╗ ███╗   ██╗ █████╗ ");
    println!(" ██║ ██╔╝██╔══██╗╚══██╔══╝██╔══██╗████╗  ██║██╔══██╗");
    println!(" █████╔╝ ███████║   ██║   ███████║██╔██╗ ██║███████║");
    println!(" ██╔═██╗ ██╔══██║   ██║   ██╔══██║██║╚██╗██║██╔══██║");
    println!(" ██║  ██╗██║  ██║   ██║   ██║  ██║██║ ╚████║██║  ██║");
    println!(" ╚═╝  ╚═╝╚═╝  ╚═╝   ╚═╝   ╚═╝  ╚═╝╚═╝  ╚═══╝╚═╝  ╚═╝");
    println!();
    println!(" Game Benchmark Automation v{}", env!("KATANA_VERSION_DISPLAY"));
}

fn print_games(games: &[String]) {
    println!("\n🎮 Available games:");
    for game in games {
        println!("  - {}", game);
    }
}

fn prompt_for_game(input: &mut impl BufRead, games: &[String]) -> io::Result<String> {
    println!("\n🎮 Available games:");
    for (i, game) in games.iter().enumerate() {
        println!("  {}. {}", i + 1, game);
    }

    prompt_number(input, "\n🎯 Enter game number to benchmark: ", |n: usize| {
        n.checked_sub(1)
            .and_then(|i| games.get(i))
            .cloned()
            .ok_or("Invalid choice.")
    })
}

/// Ask until the answer parses and passes `check`; fails on end of input
fn prompt_number<N, T>(
    input: &mut impl BufRead,
    prompt: &str,
    check: impl Fn(N) -> Result<T, &'static str>,
) -> io::Result<T>
where
    N: std::str::FromStr,
{
    let mut line = String::new();
    loop {
        print!("{}", prompt);
        io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a value was given",
            ));
        }

        match line.trim().parse::<N>() {
            Ok(n) => match check(n) {
                Ok(value) => return Ok(value),
                Err(reason) => println!("❌ {}", reason),
            },
            Err(_) => println!("❌ Please enter a valid number."),
        }
    }
}
