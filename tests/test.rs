use heat_plate::config::{Backend, BoundaryTemperatures, PlateConfig};
use heat_plate::report::{ProgressReporter, RunInfo};
use heat_plate::solver::{solve, PlateSolver, Solution, Status};
use heat_plate::PlateError;

/// Keeps everything the solver reports.
#[derive(Default)]
struct RecordingReporter {
    info: Option<RunInfo>,
    mean: Option<f64>,
    progress: Vec<(u64, f64)>,
    finished: Option<Solution>,
}

impl ProgressReporter for RecordingReporter {
    fn started(&mut self, info: &RunInfo) {
        self.info = Some(info.clone());
    }

    fn initialized(&mut self, boundary_mean: f64) {
        self.mean = Some(boundary_mean);
    }

    fn progress(&mut self, iteration: u64, max_difference: f64) {
        self.progress.push((iteration, max_difference));
    }

    fn finished(&mut self, solution: &Solution) {
        self.finished = Some(solution.clone());
    }
}

fn small_config(rows: usize, cols: usize) -> PlateConfig {
    PlateConfig {
        threads: 2,
        ..PlateConfig::with_size(rows, cols)
    }
}

#[test]
fn test_reporting_cadence() {
    let mut reporter = RecordingReporter::default();
    let (solution, _) = solve(small_config(30, 30), &mut reporter).unwrap();

    // enough sweeps that several powers of two were crossed
    assert!(solution.iterations > 64);

    let reported: Vec<u64> = reporter.progress.iter().map(|&(i, _)| i).collect();
    let expected: Vec<u64> = (0..)
        .map(|k| 1u64 << k)
        .take_while(|&i| i <= solution.iterations)
        .collect();
    assert_eq!(reported, expected);

    println!("✓ Progress reported at {:?}", reported);
}

#[test]
fn test_reporter_sees_whole_run() {
    let mut config = small_config(12, 9);
    config.threads = 3;
    config.backend = Backend::Scoped;

    let mut reporter = RecordingReporter::default();
    let (solution, _) = solve(config, &mut reporter).unwrap();

    let info = reporter.info.expect("started not called");
    assert_eq!(info.rows, 12);
    assert_eq!(info.cols, 9);
    assert_eq!(info.tolerance, 0.001);
    assert_eq!(info.threads, 3);
    assert_eq!(info.backend, Backend::Scoped);
    assert!(info.processors >= 1);

    assert_eq!(reporter.mean, Some(solution.boundary_mean));
    assert_eq!(reporter.finished, Some(solution.clone()));
    assert_eq!(reporter.progress[0].0, 1);
}

#[test]
fn test_reference_mean() {
    // 2*rows + 2*cols - 4 boundary cells; only the north row is cold
    let mut solver = PlateSolver::new(small_config(10, 20)).unwrap();
    let mean = solver.initialize();
    let boundary_cells = (2 * 10 + 2 * 20 - 4) as f64;
    let hot_cells = boundary_cells - 20.0;
    assert_eq!(mean, 100.0 * hot_cells / boundary_cells);
    assert_eq!(solver.boundary_mean(), Some(mean));
}

#[test]
fn test_uniform_boundary_any_tolerance() {
    for tolerance in [0.0, 1e-12, 0.001, 5.0] {
        let mut config = small_config(7, 11);
        config.tolerance = tolerance;
        config.boundary = BoundaryTemperatures::uniform(-12.25);

        let mut reporter = RecordingReporter::default();
        let (solution, grid) = solve(config, &mut reporter).unwrap();

        assert_eq!(solution.status, Status::Converged);
        assert_eq!(solution.iterations, 1);
        assert_eq!(solution.max_difference, 0.0);
        assert_eq!(solution.boundary_mean, -12.25);
        assert!(grid.current_data().iter().all(|&t| t == -12.25));
        assert_eq!(reporter.progress, vec![(1, 0.0)]);
    }
}

#[test]
fn test_three_by_three() {
    let mut config = small_config(3, 3);
    config.tolerance = 0.0;

    let mut reporter = RecordingReporter::default();
    let (solution, grid) = solve(config, &mut reporter).unwrap();

    assert_eq!(reporter.mean, Some(62.5));
    assert_eq!(reporter.progress, vec![(1, 12.5), (2, 0.0)]);
    assert_eq!(solution.iterations, 2);
    assert_eq!(grid.current(1, 1), 75.0);
}

#[test]
fn test_iteration_limit() {
    let mut config = small_config(60, 60);
    config.tolerance = 0.0;
    config.max_iterations = Some(10);

    let mut reporter = RecordingReporter::default();
    let (solution, _) = solve(config, &mut reporter).unwrap();

    assert_eq!(solution.status, Status::IterationLimit);
    assert!(!solution.converged());
    assert_eq!(solution.iterations, 10);
    assert!(solution.max_difference > 0.0);
    assert_eq!(
        reporter.progress.iter().map(|&(i, _)| i).collect::<Vec<_>>(),
        vec![1, 2, 4, 8]
    );
}

#[test]
fn test_invalid_configs() {
    assert!(matches!(
        PlateSolver::new(small_config(2, 5)),
        Err(PlateError::GridTooSmall { .. })
    ));

    let mut config = small_config(5, 5);
    config.threads = 0;
    assert!(matches!(
        PlateSolver::new(config),
        Err(PlateError::ZeroThreads)
    ));

    let mut config = small_config(5, 5);
    config.boundary.north = f64::NAN;
    assert!(matches!(
        PlateSolver::new(config),
        Err(PlateError::NonFiniteBoundary { edge: "north", .. })
    ));

    // rejected before either field is allocated
    assert!(matches!(
        PlateSolver::new(small_config(usize::MAX / 4, usize::MAX / 4)),
        Err(PlateError::GridTooLarge { .. })
    ));
    assert!(matches!(
        PlateSolver::new(small_config(usize::MAX / 2, 3)),
        Err(PlateError::GridTooLarge { .. })
    ));

    let mut config = small_config(5, 5);
    config.boundary = BoundaryTemperatures::uniform(1e308);
    assert!(matches!(
        PlateSolver::new(config),
        Err(PlateError::BoundaryTooLarge { .. })
    ));
}

#[test]
fn test_large_boundary_stays_finite() {
    let hot = 2f64.powi(1000);
    for backend in [Backend::Single, Backend::Rayon, Backend::Scoped] {
        let mut config = small_config(5, 5);
        config.backend = backend;
        config.boundary = BoundaryTemperatures::uniform(hot);

        let (solution, grid) = solve(config, &mut RecordingReporter::default()).unwrap();

        assert_eq!(solution.boundary_mean, hot, "{backend}");
        assert_eq!(solution.max_difference, 0.0, "{backend}");
        assert_eq!(solution.iterations, 1, "{backend}");
        assert!(grid.current_data().iter().all(|&t| t == hot));
    }
}
