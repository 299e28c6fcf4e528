//! MOEA Watch CLI - Run an instrumented random search from JSON configuration.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use moea_watch::{
    compute::{CrowdingDistanceArchive, Problem, Zdt1, evaluator_from_config},
    observe::{
        BasicObserver, Observable, PlotFrontToFileObserver, ProgressBarObserver,
        WriteFrontToFileObserver,
    },
    output::{write_function_values, write_variables},
    schema::{ObserversConfig, ProgressEvent, RunConfig, SearchConfig, Solution},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>", args[0]);
        eprintln!();
        eprintln!("Run a random search on ZDT1 with archive, evaluator and observers");
        eprintln!("taken from a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to run configuration file");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config = RunConfig::from_file(PathBuf::from(&args[1])).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &RunConfig) -> Result<(), Box<dyn Error>> {
    let problem = Zdt1::new(config.problem.number_of_variables);
    let evaluator = evaluator_from_config(&config.evaluator)?;
    let mut archive = CrowdingDistanceArchive::new(config.archive.capacity);
    let mut observable = build_observers(&config.observers, &config.search)?;
    let mut search = RandomSearch::new(&config.search, &problem)?;

    println!("MOEA Watch - Random Search");
    println!("==========================");
    println!(
        "Problem: {} ({} variables, {} objectives)",
        problem.name(),
        problem.number_of_variables(),
        problem.number_of_objectives()
    );
    println!("Evaluator: {}", evaluator.name());
    println!("Archive capacity: {}", archive.capacity());
    println!("Evaluations: {}", config.search.max_evaluations);
    println!("Observers: {}", observable.len());
    println!();

    let max_evaluations = config.search.max_evaluations;
    let start = Instant::now();
    let mut evaluations = 0u64;
    let mut observer_failures = 0usize;

    while evaluations < max_evaluations {
        let remaining = usize::try_from(max_evaluations - evaluations).unwrap_or(usize::MAX);
        let batch = search.offspring(&archive, remaining.min(config.search.population_size));

        let batch = evaluator.evaluate(batch, &problem)?;
        evaluations += batch.len() as u64;
        archive.extend(batch);

        let event = ProgressEvent::builder()
            .evaluations(evaluations)
            .computing_time(start.elapsed())
            .solutions(archive.to_population())
            .problem(problem.info())
            .termination_criterion_is_met(evaluations >= max_evaluations)
            .build()?;
        observer_failures += observable.notify(&event).len();
    }

    let elapsed = start.elapsed();
    let front = archive.to_population();
    let output = &config.output.directory;
    fs::create_dir_all(output)?;
    write_function_values(output.join("FUN.RandomSearch.ZDT1"), &front)?;
    write_variables(output.join("VAR.RandomSearch.ZDT1"), &front)?;

    println!();
    println!("Final archive: {} solutions", front.len());
    println!("Observer failures: {}", observer_failures);
    println!(
        "Time: {:.2}s ({:.0} evaluations/s)",
        elapsed.as_secs_f64(),
        evaluations as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    println!("Front written to {}", output.display());

    Ok(())
}

/// Register the observers enabled in the configuration.
fn build_observers(
    config: &ObserversConfig,
    search: &SearchConfig,
) -> Result<Observable, Box<dyn Error>> {
    let mut observable = Observable::new();

    if config.progress_bar {
        observable.register(ProgressBarObserver::new(search.max_evaluations));
    }
    if let Some(basic) = &config.basic {
        observable.register(BasicObserver::new(basic.frequency));
    }
    if let Some(write) = &config.write_front {
        observable.register(WriteFrontToFileObserver::new(&write.directory)?);
    }
    if let Some(plot) = &config.plot_front {
        observable.register(
            PlotFrontToFileObserver::new(&plot.directory)?
                .with_igd_threshold(plot.igd_threshold)
                .with_initial_igd(plot.initial_igd),
        );
    }

    Ok(observable)
}

/// Uniform sampling until the archive has members, then Gaussian
/// perturbation of random archive members.
struct RandomSearch {
    rng: StdRng,
    perturbation: Normal<f64>,
    number_of_variables: usize,
    bounds: (f64, f64),
}

impl RandomSearch {
    fn new(config: &SearchConfig, problem: &Zdt1) -> Result<Self, Box<dyn Error>> {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng,
            perturbation: Normal::new(0.0, config.mutation_strength)?,
            number_of_variables: problem.number_of_variables(),
            bounds: problem.bounds(),
        })
    }

    fn offspring(&mut self, archive: &CrowdingDistanceArchive, count: usize) -> Vec<Solution> {
        let (lower, upper) = self.bounds;
        (0..count)
            .map(|_| {
                let parent = if archive.is_empty() {
                    None
                } else {
                    archive.get(self.rng.gen_range(0..archive.len()))
                };
                let variables = match parent {
                    Some(parent) => parent
                        .variables
                        .iter()
                        .map(|&x| {
                            (x + self.perturbation.sample(&mut self.rng)).clamp(lower, upper)
                        })
                        .collect(),
                    None => (0..self.number_of_variables)
                        .map(|_| self.rng.gen_range(lower..=upper))
                        .collect(),
                };
                Solution::new(variables)
            })
            .collect()
    }
}

fn print_example_config() {
    let config = RunConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
