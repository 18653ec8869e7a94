use anyhow::{bail, Context, Result};
use bestiary::content::BuiltinSource;
use bestiary::logging::init_logging;
use bestiary::maintenance::{archive_tagged, bundle, generate_index};
use bestiary::sort::format_source;
use bestiary::statblock::render_statblock;
use bestiary::{
    load_bundle, load_monsters, AdMode, BestiaryConfig, Catalog, Dice, DirSource, FilterState,
    Monster, Tracker, CREATURE_TYPES,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

#[derive(Subcommand)]
enum Cmd {
    /// List monsters grouped by CR, optionally filtered
    List {
        /// Case-insensitive substring of the monster name
        #[arg(long, default_value = "")]
        search: String,
        /// Creature type (repeatable)
        #[arg(long = "type")]
        types: Vec<String>,
        /// Display CR such as 1/4 (repeatable)
        #[arg(long = "cr")]
        crs: Vec<String>,
        /// Source tag such as mm (repeatable)
        #[arg(long = "source")]
        sources: Vec<String>,
        /// One line per monster, without CR headings
        #[arg(long, default_value_t = false)]
        flat: bool,
        /// Emit the matching records as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print one monster's statblock
    Show {
        /// Record file name, e.g. goblin.json
        #[arg(long, required_unless_present = "name", conflicts_with = "name")]
        file: Option<String>,
        /// Monster name (legacy addressing)
        #[arg(long)]
        name: Option<String>,
        /// Print the raw record as JSON instead
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the available filter values
    Options,
    /// Regenerate the index from the JSON files in the data directory
    Index,
    /// Write every indexed record into one JSON array
    Bundle {
        /// Output path (defaults to the configured bundle file)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Move records carrying a tag out of the data directory
    Archive {
        /// Tag to look for (defaults to the configured archive tag)
        #[arg(long)]
        tag: Option<String>,
        /// Destination directory
        #[arg(long)]
        to: Option<PathBuf>,
    },
    /// Build an initiative table from monster files or names
    Tracker {
        /// Monster to add, by file or name (repeatable)
        #[arg(long = "add", required = true)]
        add: Vec<String>,
        /// RNG seed for initiative rolls
        #[arg(long)]
        seed: Option<u64>,
        /// Roll initiative with advantage
        #[arg(long, default_value_t = false, conflicts_with = "disadvantage")]
        advantage: bool,
        /// Roll initiative with disadvantage
        #[arg(long, default_value_t = false)]
        disadvantage: bool,
    },
}

#[derive(Parser)]
#[command(name = "bestiary")]
#[command(about = "Browse a bestiary of monster statblocks")]
struct Cli {
    /// Config file (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the index and record files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Load from a bundled array instead of the index
    #[arg(long, global = true)]
    bundle: Option<PathBuf>,
    /// Use the sample records compiled into the binary
    #[arg(long, global = true, default_value_t = false)]
    builtin: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn load_config(cli: &Cli) -> Result<BestiaryConfig> {
    let mut cfg = match &cli.config {
        Some(path) => BestiaryConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => BestiaryConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }
    Ok(cfg)
}

fn load_catalog(cli: &Cli, cfg: &BestiaryConfig) -> Result<Catalog> {
    let report = if cli.builtin {
        load_monsters(&BuiltinSource::default())?
    } else if let Some(path) = &cli.bundle {
        load_bundle(path).with_context(|| format!("failed to load bundle: {}", path.display()))?
    } else {
        load_monsters(&DirSource::from_config(cfg))
            .with_context(|| format!("failed to load index: {}", cfg.index_path().display()))?
    };
    let catalog = Catalog::from_report(report);
    debug!(monsters = catalog.len(), "catalog ready");
    Ok(catalog)
}

fn resolve<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a Monster> {
    catalog
        .find_by_file(key)
        .or_else(|| catalog.find_by_name(key))
        .with_context(|| format!("no monster matches '{}'", key))
}

fn summary(m: &Monster) -> String {
    let mut parts = vec![format!("CR {}", m.clean_cr)];
    if let Some(t) = m.creature_type() {
        parts.push(t.to_string());
    }
    if let Some(src) = m.source.as_deref() {
        parts.push(format_source(src));
    }
    format!("{} ({})", m.display_name, parts.join(", "))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;
    init_logging(&cfg.log_filter);

    match &cli.cmd {
        Cmd::List {
            search,
            types,
            crs,
            sources,
            flat,
            json,
        } => {
            let catalog = load_catalog(&cli, &cfg)?;
            let mut filters = FilterState::new().with_query(search.as_str());
            filters.types.extend(types.iter().cloned());
            filters.crs.extend(crs.iter().cloned());
            filters.sources.extend(sources.iter().cloned());

            if *json {
                println!("{}", serde_json::to_string_pretty(&catalog.view(&filters))?);
            } else if *flat {
                for m in catalog.view(&filters) {
                    println!("{}", summary(m));
                }
            } else {
                for group in catalog.grouped(&filters) {
                    println!("{}", group.heading);
                    for m in group.monsters {
                        println!("  {} [{}]", m.display_name, m.file);
                    }
                }
            }
        }
        Cmd::Show { file, name, json } => {
            let catalog = load_catalog(&cli, &cfg)?;
            let monster = match (file, name) {
                (Some(f), _) => catalog
                    .find_by_file(f)
                    .with_context(|| format!("no monster in file '{}'", f))?,
                (None, Some(n)) => catalog
                    .find_by_name(n)
                    .with_context(|| format!("no monster named '{}'", n))?,
                (None, None) => bail!("either --file or --name is required"),
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&monster.record)?);
            } else {
                println!("{}", render_statblock(monster));
            }
        }
        Cmd::Options => {
            let catalog = load_catalog(&cli, &cfg)?;
            println!("types:   {}", CREATURE_TYPES.join(", "));
            println!("crs:     {}", catalog.cr_options().join(", "));
            println!("sources: {}", catalog.source_options().join(", "));
        }
        Cmd::Index => {
            let files = generate_index(&cfg.data_dir, &cfg)?;
            println!("indexed {} files into {}", files.len(), cfg.index_path().display());
        }
        Cmd::Bundle { out } => {
            let out = out.clone().unwrap_or_else(|| cfg.bundle_path());
            let count = if cli.builtin {
                bundle(&BuiltinSource::default(), &out)?
            } else {
                bundle(&DirSource::from_config(&cfg), &out)?
            };
            println!("bundled {} monsters into {}", count, out.display());
        }
        Cmd::Archive { tag, to } => {
            let tag = tag.clone().unwrap_or_else(|| cfg.archive_tag.clone());
            let to = to.clone().unwrap_or_else(|| cfg.archive_dir.clone());
            let moved = archive_tagged(&cfg.data_dir, &to, &tag, &cfg)?;
            for file in &moved {
                println!("moved {} to {}", file, to.display());
            }
            println!("archived {} records tagged '{}'", moved.len(), tag);
        }
        Cmd::Tracker {
            add,
            seed,
            advantage,
            disadvantage,
        } => {
            let mode = match (*advantage, *disadvantage) {
                (true, _) => AdMode::Advantage,
                (_, true) => AdMode::Disadvantage,
                _ => AdMode::Normal,
            };
            let catalog = load_catalog(&cli, &cfg)?;
            let mut tracker = Tracker::new();
            for key in add {
                let id = tracker.add(resolve(&catalog, key)?);
                tracker.set_roll_mode(id, mode);
            }
            let mut dice = Dice::from_seed(seed.unwrap_or(cfg.seed));
            tracker.roll_initiative(&mut dice);

            println!("{:>4}  {:<24} {:<28} {}", "init", "name", "ac", "hp");
            for e in tracker.ordered() {
                let init = e.initiative.map(|i| i.to_string()).unwrap_or_default();
                println!("{:>4}  {:<24} {:<28} {}", init, e.name, e.ac, e.hp);
            }
        }
    }
    Ok(())
}
