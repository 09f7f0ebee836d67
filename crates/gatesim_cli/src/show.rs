//! `gatesim show`: print a circuit listing.

use crate::pipeline::{load_config, read_netlist};
use crate::{GlobalArgs, ShowArgs};

/// Runs the `gatesim show` command.
pub fn run(args: &ShowArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let circuit = read_netlist(&args.netlist, config.simulation.resolution)?;
    println!("{circuit}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn show_parses_and_succeeds() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("c.v");
        fs::write(&path, "module c(a, y);\ninput a;\noutput y;\nnot (y, a);\nendmodule\n").unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(tmp.path().to_str().unwrap().to_string()),
        };
        assert_eq!(run(&ShowArgs { netlist: path }, &global).unwrap(), 0);
    }
}
