use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use infra::file::csv;
use infra::file::dens::DenTable;
use infra::file::profiles::ProfileStore;
use rng_core::filter::{FrameFilter, ShinyFilter};
use rng_core::frame::{Frame, Gender};
use rng_core::generator::RaidGenerator;
use rng_core::models::{
    AbilityLock, DenProvider, GameVersion, GenderLock, Nature, PersonalProvider, Raid, Rarity,
    ShinyLock,
};
use search::{PartialFrame, SearchHandle, SearchOutcome, SeedRange, SeedSearcher};

#[derive(Parser)]
#[command(name = "raidtools")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate raid frames from a known seed
    Generate {
        /// 64-bit base seed (hex)
        seed: String,
        /// First day offset
        #[arg(long, default_value_t = 0)]
        initial_frame: u32,
        /// Number of frames to derive
        #[arg(long, default_value_t = 30)]
        max_results: u32,
        #[command(flatten)]
        encounter: EncounterArgs,
        /// Allowed natures (empty = all)
        #[arg(long)]
        nature: Vec<String>,
        #[arg(long, value_enum, default_value_t = ShinyArg::Any)]
        shiny: ShinyArg,
        #[arg(long, value_enum)]
        gender: Option<GenderArg>,
        /// Required ability slot (0/1/2)
        #[arg(long)]
        ability: Option<u8>,
        /// Lower IV bounds as "hp,atk,def,spa,spd,spe"
        #[arg(long)]
        min_ivs: Option<String>,
        /// Upper IV bounds as "hp,atk,def,spa,spd,spe"
        #[arg(long)]
        max_ivs: Option<String>,
        /// Disable all filters
        #[arg(long)]
        disable_filters: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
        /// Output path for --output csv
        #[arg(long, default_value = "results.csv")]
        csv_path: PathBuf,
    },
    /// Search base seeds matching observed raids
    SeedSearch {
        /// Observations JSON (array of partial frames with day offsets)
        observations: PathBuf,
        #[command(flatten)]
        encounter: EncounterArgs,
        /// Search range start (hex)
        #[arg(long, default_value = "0")]
        range_start: String,
        /// Candidate count (default: the full 32-bit space)
        #[arg(long)]
        range_len: Option<u64>,
        /// Worker count (default: available parallelism)
        #[arg(long)]
        threads: Option<usize>,
        /// Stop at the first verified candidate
        #[arg(long)]
        first: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

#[derive(Args)]
struct EncounterArgs {
    /// Path to profiles.json
    #[arg(long, default_value = "profiles.json")]
    profiles: PathBuf,
    /// Profile name inside profiles.json
    #[arg(long)]
    profile: Option<String>,
    /// Trainer ID (overrides the profile)
    #[arg(long)]
    tid: Option<u16>,
    /// Secret ID (overrides the profile)
    #[arg(long)]
    sid: Option<u16>,
    #[arg(long, value_enum)]
    version: Option<VersionArg>,
    /// Den index (0-99, 100 = event)
    #[arg(long)]
    den: Option<u8>,
    #[arg(long, value_enum, default_value_t = RarityArg::Normal)]
    rarity: RarityArg,
    /// Raid slot within the den
    #[arg(long, default_value_t = 0)]
    slot: u8,
    /// Den table JSON (default: built-in table)
    #[arg(long)]
    dens: Option<PathBuf>,
    /// Guaranteed IV count override (0-6)
    #[arg(long)]
    iv_count: Option<u8>,
    /// Ability lock override (0/1/2 fixed, 3 no hidden, 4 any)
    #[arg(long)]
    ability_lock: Option<u8>,
    /// Gender lock override (0 random, 1 male, 2 female, 3 genderless)
    #[arg(long)]
    gender_lock: Option<u8>,
    /// Gender ratio override (255/254/0 or threshold)
    #[arg(long)]
    gender_ratio: Option<u8>,
    /// Shiny lock override (0 random, 1 always, 2 never, 3 star, 4 square)
    #[arg(long)]
    shiny_lock: Option<u8>,
}

#[derive(Copy, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Copy, Clone, ValueEnum)]
enum RarityArg {
    Normal,
    Rare,
}

#[derive(Copy, Clone, ValueEnum)]
enum VersionArg {
    Sword,
    Shield,
}

#[derive(Copy, Clone, ValueEnum)]
enum GenderArg {
    Male,
    Female,
    Genderless,
}

#[derive(Copy, Clone, ValueEnum)]
enum ShinyArg {
    Any,
    Star,
    Square,
    /// 星型・菱形どちらでも
    Shiny,
}

#[derive(Serialize)]
struct FrameOut {
    frame: u32,
    seed: String,
    ec: String,
    pid: String,
    ivs: [u8; 6],
    ability: u8,
    gender: &'static str,
    nature: &'static str,
    shiny: &'static str,
}

impl FrameOut {
    fn from(frame: &Frame) -> Self {
        Self {
            frame: frame.frame,
            seed: format!("{:016X}", frame.seed),
            ec: format!("{:08X}", frame.ec),
            pid: format!("{:08X}", frame.pid),
            ivs: frame.ivs,
            ability: frame.ability,
            gender: frame.gender.name(),
            nature: frame.nature.name(),
            shiny: frame.shiny.name(),
        }
    }
}

#[derive(Serialize)]
struct SearchOut {
    outcome: &'static str,
    seeds: Vec<String>,
    checked: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            seed,
            initial_frame,
            max_results,
            encounter,
            nature,
            shiny,
            gender,
            ability,
            min_ivs,
            max_ivs,
            disable_filters,
            output,
            csv_path,
        } => {
            let seed = parse_hex(&seed)?;
            let filter = build_filter(
                &nature,
                shiny,
                gender,
                ability,
                min_ivs.as_deref(),
                max_ivs.as_deref(),
                disable_filters,
            )?;
            run_generate(
                seed,
                initial_frame,
                max_results,
                &encounter,
                &filter,
                output,
                &csv_path,
            )
        }
        Command::SeedSearch {
            observations,
            encounter,
            range_start,
            range_len,
            threads,
            first,
            output,
        } => {
            let start = parse_hex(&range_start)?;
            let len = range_len.unwrap_or(SeedRange::BIT32.len);
            run_seed_search(
                &observations,
                &encounter,
                SeedRange { start, len },
                threads,
                first,
                output,
            )
        }
    }
}

fn run_generate(
    seed: u64,
    initial_frame: u32,
    max_results: u32,
    encounter: &EncounterArgs,
    filter: &FrameFilter,
    output: OutputFormat,
    csv_path: &PathBuf,
) -> Result<()> {
    let (tid, sid, version) = resolve_trainer(encounter)?;
    let (raid, table) = resolve_raid(encounter, version)?;

    let generator = RaidGenerator::new(initial_frame, max_results, tid, sid, raid)?;
    let frames = generator.generate(filter, seed);
    tracing::info!(frames = frames.len(), "generation done");

    match output {
        OutputFormat::Text => {
            if let Ok(info) = table.info(raid.species, raid.alt_form) {
                println!(
                    "Species: {} ({}/{}/{})",
                    info.name, info.ability1, info.ability2, info.ability_hidden
                );
            }
            println!("Frame  Shiny   Nature    Ability  IVs                 Gender  EC        PID");
            for frame in &frames {
                println!(
                    "{:<6} {:<7} {:<9} {:<8} {:>2}/{:>2}/{:>2}/{:>2}/{:>2}/{:>2}  {:<7} {:08X}  {:08X}",
                    frame.frame,
                    frame.shiny.name(),
                    frame.nature.name(),
                    frame.ability,
                    frame.ivs[0],
                    frame.ivs[1],
                    frame.ivs[2],
                    frame.ivs[3],
                    frame.ivs[4],
                    frame.ivs[5],
                    frame.gender.name(),
                    frame.ec,
                    frame.pid,
                );
            }
            println!("{} frame(s)", frames.len());
        }
        OutputFormat::Json => {
            let out: Vec<FrameOut> = frames.iter().map(FrameOut::from).collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Csv => {
            csv::write_csv(csv_path, &frames)
                .with_context(|| format!("writing {}", csv_path.display()))?;
            println!("{} frame(s) -> {}", frames.len(), csv_path.display());
        }
    }
    Ok(())
}

fn run_seed_search(
    observations_path: &PathBuf,
    encounter: &EncounterArgs,
    range: SeedRange,
    threads: Option<usize>,
    first: bool,
    output: OutputFormat,
) -> Result<()> {
    let text = fs::read_to_string(observations_path)
        .with_context(|| format!("reading {}", observations_path.display()))?;
    let observations: Vec<PartialFrame> = serde_json::from_str(&text)?;

    let (tid, sid, version) = resolve_trainer(encounter)?;
    let (raid, _table) = resolve_raid(encounter, version)?;

    let threads = threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });

    let searcher = SeedSearcher::new(raid, tid, sid, threads)?.first_match(first);
    let handle = SearchHandle::new();
    let outcome = searcher.search(range, &observations, &handle)?;

    let (label, seeds) = match &outcome {
        SearchOutcome::Exhausted { seeds } => ("exhausted", seeds),
        SearchOutcome::FirstMatch { seeds } => ("first_match", seeds),
        SearchOutcome::Cancelled { seeds } => ("cancelled", seeds),
    };

    match output {
        OutputFormat::Json => {
            let out = SearchOut {
                outcome: label,
                seeds: seeds.iter().map(|s| format!("{s:016X}")).collect(),
                checked: handle.progress(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        _ => {
            for seed in seeds {
                println!("{seed:016X}");
            }
            match &outcome {
                SearchOutcome::Exhausted { seeds } if seeds.is_empty() => {
                    println!("no candidates found (search space exhausted)");
                }
                SearchOutcome::Exhausted { seeds } if seeds.len() > 1 => {
                    println!(
                        "{} candidates remain; supply more observations to narrow them down",
                        seeds.len()
                    );
                }
                SearchOutcome::Cancelled { .. } => {
                    println!("search cancelled before completion");
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn resolve_trainer(encounter: &EncounterArgs) -> Result<(u16, u16, GameVersion)> {
    let mut tid = encounter.tid;
    let mut sid = encounter.sid;
    let mut version = encounter.version.map(|v| match v {
        VersionArg::Sword => GameVersion::Sword,
        VersionArg::Shield => GameVersion::Shield,
    });

    if let Some(name) = &encounter.profile {
        let store = ProfileStore::load(&encounter.profiles)
            .with_context(|| format!("reading {}", encounter.profiles.display()))?;
        let profile = store.find(name)?;
        tid = tid.or(Some(profile.tid));
        sid = sid.or(Some(profile.sid));
        version = version.or(Some(profile.version));
    }

    match (tid, sid) {
        (Some(tid), Some(sid)) => Ok((tid, sid, version.unwrap_or(GameVersion::Sword))),
        _ => bail!("no trainer identity: pass --profile or both --tid and --sid"),
    }
}

/// 巣穴テーブルか手動指定からレイド設定を組み立てる
///
/// どちら経由でも生成側のコードパスは一つ。
fn resolve_raid(encounter: &EncounterArgs, version: GameVersion) -> Result<(Raid, DenTable)> {
    let table = match &encounter.dens {
        Some(path) => {
            DenTable::load(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => DenTable::builtin()?,
    };

    let rarity = match encounter.rarity {
        RarityArg::Normal => Rarity::Normal,
        RarityArg::Rare => Rarity::Rare,
    };

    let mut raid = match encounter.den {
        Some(den) => table.raid(den, rarity, version, encounter.slot)?,
        None => {
            if encounter.iv_count.is_none() {
                bail!("no encounter: pass --den or at least --iv-count");
            }
            Raid {
                species: 0,
                alt_form: 0,
                iv_count: 0,
                ability: AbilityLock::Any,
                gender: GenderLock::Random,
                gender_ratio: 127,
                shiny: ShinyLock::Random,
                gigantamax: false,
            }
        }
    };

    if let Some(iv_count) = encounter.iv_count {
        raid.iv_count = iv_count;
    }
    if let Some(code) = encounter.ability_lock {
        raid.ability =
            AbilityLock::from_code(code).with_context(|| format!("bad ability lock {code}"))?;
    }
    if let Some(code) = encounter.gender_lock {
        raid.gender =
            GenderLock::from_code(code).with_context(|| format!("bad gender lock {code}"))?;
    }
    if let Some(ratio) = encounter.gender_ratio {
        raid.gender_ratio = ratio;
    }
    if let Some(code) = encounter.shiny_lock {
        raid.shiny =
            ShinyLock::from_code(code).with_context(|| format!("bad shiny lock {code}"))?;
    }
    raid.validate()?;

    Ok((raid, table))
}

fn build_filter(
    natures: &[String],
    shiny: ShinyArg,
    gender: Option<GenderArg>,
    ability: Option<u8>,
    min_ivs: Option<&str>,
    max_ivs: Option<&str>,
    disable_filters: bool,
) -> Result<FrameFilter> {
    let mut filter = FrameFilter::default();
    filter.skip = disable_filters;

    if !natures.is_empty() {
        filter.natures = [false; 25];
        for name in natures {
            let nature = Nature::from_name(name)
                .with_context(|| format!("unknown nature '{name}'"))?;
            filter.allow_nature(nature, true);
        }
    }

    filter.shiny = match shiny {
        ShinyArg::Any => ShinyFilter::Any,
        ShinyArg::Star => ShinyFilter::Star,
        ShinyArg::Square => ShinyFilter::Square,
        ShinyArg::Shiny => ShinyFilter::Either,
    };

    filter.gender = gender.map(|g| match g {
        GenderArg::Male => Gender::Male,
        GenderArg::Female => Gender::Female,
        GenderArg::Genderless => Gender::Genderless,
    });
    filter.ability = ability;

    if let Some(text) = min_ivs {
        filter.min = parse_ivs(text, 0)?;
    }
    if let Some(text) = max_ivs {
        filter.max = parse_ivs(text, 31)?;
    }

    Ok(filter)
}

fn parse_hex(text: &str) -> Result<u64> {
    let trimmed = text.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(trimmed, 16).with_context(|| format!("bad hex value '{text}'"))
}

/// "31,0,31,x,31,0" 形式。xは制限なし
fn parse_ivs(text: &str, unset: u8) -> Result<[u8; 6]> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 6 {
        bail!("expected 6 comma separated IVs, got '{text}'");
    }
    let mut ivs = [unset; 6];
    for (slot, part) in ivs.iter_mut().zip(parts) {
        let part = part.trim();
        if part.eq_ignore_ascii_case("x") {
            continue;
        }
        let value: u8 = part
            .parse()
            .with_context(|| format!("bad IV value '{part}'"))?;
        if value > 31 {
            bail!("IV {value} out of range");
        }
        *slot = value;
    }
    Ok(ivs)
}
