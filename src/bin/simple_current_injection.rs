use std::process::exit;
use compartmental_workflows::experiment::{
    render_current_clamp_figure, run_current_clamp_experiment,
};


const CONFIG_FILE: &str = "SimpleCurrentInjection.toml";
const FIGURE_FILE: &str = "SimpleCurrentInjection.png";

fn main() {
    println!("Running current injection workflow from {}", CONFIG_FILE);

    let result = match run_current_clamp_experiment(CONFIG_FILE) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };

    if let Err(err) = render_current_clamp_figure(&result, FIGURE_FILE) {
        eprintln!("{}", err);
        exit(1);
    }

    println!("Wrote {}", FIGURE_FILE);
}
