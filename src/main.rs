use clap::{Parser, Subcommand};
use jictool::container::{Container, ReaderOptions};
use jictool::firmware::read_firmware;
use jictool::page_type::{describe, PayloadKind, FIRMWARE_PAGE_TYPE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jictool", about = "Altera/Intel FPGA .jic file manipulation tool")]
struct Cli {
    /// Disable some strict parsing checks
    #[arg(short, long, global = true)]
    nonstrict: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pages
    List {
        input: PathBuf,
        /// Print the page table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show root tag, page types, string pages and firmware summary
    Info {
        input: PathBuf,
    },
    /// Extract the firmware image (complete configuration device image, RPD-compatible)
    Extract {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let options = ReaderOptions { strict: !cli.nonstrict };

    match cli.command {

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { input, json } => {
            let jic = Container::open_path(&input, options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&jic.page_infos())?);
            } else {
                print!("{}", jic.listing());
            }
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input } => {
            let mut jic = Container::open_path(&input, options)?;
            let root    = *jic.root_tag();
            let fields  = root.decode_fields();

            println!("── JIC container ────────────────────────────────────────");
            println!("  Path           {}", input.display());
            println!("  Size           {} B", jic.source_len());
            println!("  Mode           {}", if jic.is_strict() { "strict" } else { "lenient" });
            println!("  Root tag       {}  ({})", root.hexdump(), root);
            println!("  Signature      {}", String::from_utf8_lossy(&fields.signature));
            println!("  Fields         a={:#x} b={:#x}", fields.field_a, fields.field_b);
            println!("  Pages          {}", jic.pages().len());
            println!("  Page types ({}):", jic.list_types().len());
            for t in jic.list_types() {
                println!("    {:>3} x{:<3} {}", t, jic.index().count_of(t),
                         describe(t));
            }

            let string_pages: Vec<usize> = (0..jic.pages().len())
                .filter(|&i| {
                    let t = jic.pages()[i].type_code;
                    describe(t).kind == PayloadKind::String
                })
                .collect();
            if !string_pages.is_empty() {
                println!("  Strings:");
                for i in string_pages {
                    if let Some(text) = jic.read_string_page(i)? {
                        let label = describe(jic.pages()[i].type_code).label;
                        println!("    {:<26} {}", label, text);
                    }
                }
            }

            if jic.index().count_of(FIRMWARE_PAGE_TYPE) == 0 {
                println!("  Firmware       none");
            } else {
                match read_firmware(&mut jic) {
                    Ok(fw) => {
                        println!("  Firmware       {} B at offset {}", fw.len(), fw.page_offset);
                        println!("  Firmware tag   {}  ({})", fw.tag.hexdump(), fw.tag);
                        println!("  Firmware CRC32 {:08x}", fw.crc32());
                        println!("  Trailing 0xFF  {} B", fw.trailing_erased_len());
                    }
                    Err(e) => println!("  Firmware       unusable: {}", e),
                }
            }
        }

        // ── Extract ──────────────────────────────────────────────────────────
        Commands::Extract { input, output } => {
            let mut jic = Container::open_path(&input, options)?;
            let fw = read_firmware(&mut jic)?;
            std::fs::write(&output, &fw.data)?;
            println!("Firmware extract: {} bytes saved to {} (crc32 {:08x})",
                     fw.len(), output.display(), fw.crc32());
        }
    }

    Ok(())
}
