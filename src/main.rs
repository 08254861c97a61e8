use std::io::{self, BufRead, Write};

use dbquery::{
    game::{Table, TableSettings},
    helpers::format_table,
};
use log::{error, info};

fn init_logging() {
    env_logger::init();
}

/// The grid with a 1-based row number in front of every row.
fn numbered_grid(table: &Table) -> String {
    let mut rows = vec![std::iter::once("#".to_string())
        .chain(table.header().into_iter().map(str::to_string))
        .collect::<Vec<_>>()];
    for (i, row) in table.rows().into_iter().enumerate() {
        rows.push(
            std::iter::once((i + 1).to_string())
                .chain(row.into_iter().map(str::to_string))
                .collect(),
        );
    }
    format_table(&rows, "  ")
}

fn read_row(input: &str, num_rows: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(row) if row >= 1 && row <= num_rows => Some(row - 1),
        _ => None,
    }
}

fn main() {
    init_logging();

    let difficulty = TableSettings::difficulty_from_env();
    let settings = TableSettings::for_difficulty(difficulty).with_seed(TableSettings::seed_from_env());
    info!(target: "table", "Starting {} round", difficulty.to_string());

    let table = match Table::generate(&settings) {
        Ok(table) => table,
        Err(e) => {
            error!(target: "table", "Could not generate table: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}\n", numbered_grid(&table));
    println!("{}\n", table.format_constraints("\n"));
    if TableSettings::is_debug_mode() {
        println!("seed {} solution {:?}\n", table.seed, table.solution().map(|r| r + 1));
    }

    print!("row> ");
    if let Err(e) = io::stdout().flush() {
        error!(target: "table", "Could not write prompt: {}", e);
        std::process::exit(1);
    }
    let mut line = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut line) {
        error!(target: "table", "Could not read answer: {}", e);
        std::process::exit(1);
    }

    match read_row(&line, table.num_rows) {
        Some(row) if table.submit(row) => println!("ACCESS GRANTED"),
        _ => println!("INCORRECT"),
    }
}
