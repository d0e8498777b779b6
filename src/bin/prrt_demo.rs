// Parallel RRT demo: plan around circular obstacles in a 2-D world
// and plot the explored tree and the solution path.

use std::sync::Arc;
use std::time::Duration;

use gnuplot::{AxesCommon, Caption, Color, Figure, PointSymbol};
use nalgebra::DVector;

use parallel_rrt::{BallGoal, GoalHandle, ParallelRrt, PrrtConfig, RealVectorSpace, State};

fn main() {
    env_logger::init();

    println!("Parallel RRT planning start!!");

    // (x, y, radius)
    let obstacles = vec![
        (5.0, 5.0, 1.0),
        (3.0, 6.0, 2.0),
        (7.0, 5.0, 2.0),
        (9.0, 8.0, 1.0),
    ];

    let obs = obstacles.clone();
    let space = Arc::new(RealVectorSpace::with_validity(
        vec![(-2.0, 15.0), (-2.0, 15.0)],
        move |s: &State| {
            obs.iter()
                .all(|&(ox, oy, r)| ((s[0] - ox).powi(2) + (s[1] - oy).powi(2)).sqrt() > r)
        },
    ));

    let config = PrrtConfig {
        goal_bias: 0.05,
        rho: 0.1,
        thread_count: 4,
        seed: None,
    };

    let mut planner = ParallelRrt::new(space, config).expect("valid configuration");
    planner.add_start_state(DVector::from_vec(vec![0.0, 0.0]));

    let goal_center = (10.0, 10.0);
    let goal = GoalHandle::from_sampleable(BallGoal::new(
        DVector::from_vec(vec![goal_center.0, goal_center.1]),
        0.5,
    ));
    planner.set_goal(goal.clone());

    let solved = planner
        .solve(Duration::from_secs_f64(1.0))
        .expect("planner is configured");

    let states = planner.get_states();
    println!(
        "solved: {}, tree size: {}, distance to goal: {:.4}",
        solved,
        states.len(),
        goal.region().difference()
    );

    let tree_x: Vec<f64> = states.iter().map(|s| s[0]).collect();
    let tree_y: Vec<f64> = states.iter().map(|s| s[1]).collect();

    let mut fg = Figure::new();
    let axes = fg.axes2d();
    axes.set_title("Parallel RRT", &[])
        .set_aspect_ratio(gnuplot::AutoOption::Fix(1.0))
        .points(&tree_x, &tree_y, &[Caption("tree"), Color("gray"), PointSymbol('.')]);

    for &(ox, oy, r) in &obstacles {
        let circle_x: Vec<f64> = (0..=60)
            .map(|k| ox + r * (k as f64 / 60.0 * 2.0 * std::f64::consts::PI).cos())
            .collect();
        let circle_y: Vec<f64> = (0..=60)
            .map(|k| oy + r * (k as f64 / 60.0 * 2.0 * std::f64::consts::PI).sin())
            .collect();
        axes.lines(&circle_x, &circle_y, &[Color("blue")]);
    }

    if let Some(path) = goal.region().solution_path() {
        println!(
            "path: {} states, length {:.3}{}",
            path.len(),
            path.length(),
            if solved { "" } else { " (approximate)" }
        );
        let path_x: Vec<f64> = path.states.iter().map(|s| s[0]).collect();
        let path_y: Vec<f64> = path.states.iter().map(|s| s[1]).collect();
        axes.lines(&path_x, &path_y, &[Caption("path"), Color("red")]);
    } else {
        println!("no path found");
    }

    axes.points(
        &[0.0],
        &[0.0],
        &[Caption("start"), Color("green"), PointSymbol('O')],
    );
    axes.points(
        &[goal_center.0],
        &[goal_center.1],
        &[Caption("goal"), Color("red"), PointSymbol('x')],
    );

    fg.show().unwrap();

    println!("Parallel RRT planning finish!!");
}
