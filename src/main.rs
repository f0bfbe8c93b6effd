use colored::Colorize;

use astgen::cli::CommandLineInterface;

fn main() {
    let command_line_interface = CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{}: {error:#}", "error".red().bold());
        std::process::exit(1);
    }
}
