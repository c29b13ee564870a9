// Writes the crawlboard man page to the given directory (default: ./man)

use clap::CommandFactory;
use crawlboard::cli::Cli;
use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    std::fs::create_dir_all(&out_dir)?;

    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd.clone());
    let mut buffer: Vec<u8> = Vec::new();
    man.render(&mut buffer)?;
    std::fs::write(out_dir.join("crawlboard.1"), buffer)?;

    for sub in cmd.get_subcommands() {
        let name = format!("crawlboard-{}", sub.get_name());
        let mut buffer: Vec<u8> = Vec::new();
        clap_mangen::Man::new(sub.clone()).title(name.to_uppercase()).render(&mut buffer)?;
        std::fs::write(out_dir.join(format!("{}.1", name)), buffer)?;
    }

    println!("Man pages written to {}", out_dir.display());
    Ok(())
}
