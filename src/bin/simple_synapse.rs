use std::process::exit;
use compartmental_workflows::experiment::{render_synapse_figure, run_synapse_experiment};


const CONFIG_FILE: &str = "SimpleSynapse.toml";
const FIGURE_FILE: &str = "SimpleSynapse.png";

fn main() {
    println!("Running synaptic workflow from {}", CONFIG_FILE);

    let result = match run_synapse_experiment(CONFIG_FILE) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };

    if let Err(err) = render_synapse_figure(&result, FIGURE_FILE) {
        eprintln!("{}", err);
        exit(1);
    }

    println!("Wrote {}", FIGURE_FILE);
}
