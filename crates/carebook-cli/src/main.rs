//! `carebook` — one request against a Carebook record store per invocation.
//!
//! # Usage
//!
//! ```text
//! carebook list --category P --fully-visited false
//! carebook add-patient --name "Alice Tan" --gender F --phone 98765432 \
//!   --email alice@example.com --address "Blk 30 Clementi Ave 3" \
//!   --slot 2024-01-01,0
//! carebook mark 1 0
//! carebook --store ~/care/ward.db assign 1 0 2
//! ```
//!
//! Settings come from `carebook.toml` (or `--config`) and then `CAREBOOK_*`
//! environment variables; `--store` overrides the configured store path.

use std::{
  collections::BTreeSet,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use carebook_core::{
  date_slot::DateSlot,
  field::{Address, Email, Gender, Name, Phone, Tag},
  filter::FilterRequest,
  mutation::{Mutation, PersonEdit},
  person::{Contact, Patient, Person},
  population::Population,
  session::{CommandOutcome, Session},
  store::RecordStore,
  uid::Uid,
};
use carebook_record::JsonFileStore;
use carebook_store_sqlite::SqliteStore;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Home-care visit book for patients and caregivers")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "carebook.toml")]
  config: PathBuf,

  /// Record store to use instead of the configured one.
  #[arg(short, long, value_name = "PATH")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the persons matching every given criterion.
  List(ListArgs),
  AddPatient {
    #[command(flatten)]
    contact: ContactArgs,
    /// A visit as `YYYY-MM-DD,N`; repeatable.
    #[arg(long = "slot", value_parser = parse_slot)]
    slots:   Vec<DateSlot>,
  },
  AddCaregiver {
    #[command(flatten)]
    contact: ContactArgs,
  },
  /// Change a displayed person's details. Uid and category are fixed.
  Edit(EditArgs),
  Delete {
    #[arg(value_parser = parse_uid)]
    uid: Uid,
  },
  /// Record a visit as carried out.
  Mark(SlotArgs),
  MarkFailed(SlotArgs),
  /// Withdraw a failed outcome.
  Unmark(SlotArgs),
  Assign {
    #[command(flatten)]
    target:    SlotArgs,
    #[arg(value_parser = parse_uid)]
    caregiver: Uid,
  },
  Unassign(SlotArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
  /// Case-insensitive substring of the address.
  #[arg(long)]
  address:        Option<String>,
  /// `P` or `C`.
  #[arg(long)]
  category:       Option<String>,
  /// `M` or `F`.
  #[arg(long)]
  gender:         Option<String>,
  #[arg(long)]
  tag:            Option<String>,
  #[arg(long, value_name = "BOOL")]
  fully_assigned: Option<bool>,
  #[arg(long, value_name = "BOOL")]
  fully_visited:  Option<bool>,
}

#[derive(Args, Debug)]
struct ContactArgs {
  #[arg(long, value_parser = Name::parse)]
  name:    Name,
  #[arg(long, value_parser = Gender::parse)]
  gender:  Gender,
  #[arg(long, value_parser = Phone::parse)]
  phone:   Phone,
  #[arg(long, value_parser = Email::parse)]
  email:   Email,
  #[arg(long, value_parser = Address::parse)]
  address: Address,
  #[arg(long = "tag", value_parser = Tag::parse)]
  tags:    Vec<Tag>,
}

#[derive(Args, Debug)]
struct EditArgs {
  #[arg(value_parser = parse_uid)]
  uid:         Uid,
  #[arg(long, value_parser = Name::parse)]
  name:        Option<Name>,
  #[arg(long, value_parser = Gender::parse)]
  gender:      Option<Gender>,
  #[arg(long, value_parser = Phone::parse)]
  phone:       Option<Phone>,
  #[arg(long, value_parser = Email::parse)]
  email:       Option<Email>,
  #[arg(long, value_parser = Address::parse)]
  address:     Option<Address>,
  /// Replaces every tag; repeatable.
  #[arg(long = "tag", value_parser = Tag::parse, conflicts_with = "clear_tags")]
  tags:        Vec<Tag>,
  #[arg(long)]
  clear_tags:  bool,
  /// Replaces every date slot; repeatable.
  #[arg(long = "slot", value_parser = parse_slot, conflicts_with = "clear_slots")]
  slots:       Vec<DateSlot>,
  #[arg(long)]
  clear_slots: bool,
}

#[derive(Args, Debug)]
struct SlotArgs {
  #[arg(value_parser = parse_uid)]
  uid:   Uid,
  /// Zero-based position in the patient's date-slot list.
  index: usize,
}

fn parse_uid(raw: &str) -> Result<Uid, String> {
  let raw: u64 = raw.parse().map_err(|e| format!("{raw:?}: {e}"))?;
  Uid::new(raw).map_err(|e| e.to_string())
}

/// `YYYY-MM-DD,N`.
fn parse_slot(raw: &str) -> Result<DateSlot, String> {
  let (date, slot) = raw
    .split_once(',')
    .ok_or_else(|| format!("{raw:?}: expected YYYY-MM-DD,N"))?;
  let date: NaiveDate = date.trim().parse().map_err(|e| format!("{date:?}: {e}"))?;
  let slot: u8 = slot.trim().parse().map_err(|e| format!("{slot:?}: {e}"))?;
  DateSlot::new(date, slot).map_err(|e| e.to_string())
}

// ─── Config file ──────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Backend {
  #[default]
  Json,
  Sqlite,
}

#[derive(Deserialize, Debug)]
struct CarebookConfig {
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
  #[serde(default)]
  backend:    Backend,
}

fn default_store_path() -> PathBuf { PathBuf::from("carebook.json") }

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CAREBOOK"))
    .build()
    .context("failed to read config file")?;

  let cfg: CarebookConfig = settings
    .try_deserialize()
    .context("failed to deserialise CarebookConfig")?;

  let store_path = expand_tilde(cli.store.as_deref().unwrap_or(&cfg.store_path));
  tracing::debug!("using {:?} store at {}", cfg.backend, store_path.display());

  match cfg.backend {
    Backend::Json => run(&JsonFileStore::new(store_path), cli.command),
    Backend::Sqlite => {
      let store = SqliteStore::open(&store_path)
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      run(&store, cli.command)
    }
  }
}

/// Load, apply one command, and save if anything changed.
fn run<S>(store: &S, command: Command) -> anyhow::Result<()>
where
  S: RecordStore,
  S::Error: Send + Sync,
{
  let mut session = Session::default();
  session.reload(store).context("failed to load records")?;

  let outcome = match command {
    Command::List(args) => session.list(&args.into_request()),
    command => {
      let mutation = command.into_mutation(session.population())?;
      let outcome = session.apply_today(mutation)?;
      session.save(store).context("failed to save records")?;
      outcome
    }
  };

  print_outcome(&outcome);
  Ok(())
}

fn print_outcome(outcome: &CommandOutcome) {
  println!("{}", outcome.summary);
  for (position, person) in outcome.view.iter().enumerate() {
    println!("{}. {person}", position + 1);
  }
}

// ─── Requests ─────────────────────────────────────────────────────────────────

impl ListArgs {
  fn into_request(self) -> FilterRequest {
    FilterRequest {
      address:        self.address,
      category:       self.category,
      gender:         self.gender,
      tag:            self.tag,
      fully_assigned: self.fully_assigned,
      fully_visited:  self.fully_visited,
    }
  }
}

impl ContactArgs {
  fn into_contact(self, uid: Uid) -> Contact {
    Contact {
      uid,
      name: self.name,
      gender: self.gender,
      phone: self.phone,
      email: self.email,
      address: self.address,
      tags: self.tags.into_iter().collect(),
    }
  }
}

impl EditArgs {
  fn into_edit(self) -> PersonEdit {
    let tags = (self.clear_tags || !self.tags.is_empty())
      .then(|| self.tags.into_iter().collect::<BTreeSet<_>>());
    let date_slots =
      (self.clear_slots || !self.slots.is_empty()).then_some(self.slots);
    PersonEdit {
      name: self.name,
      gender: self.gender,
      phone: self.phone,
      email: self.email,
      address: self.address,
      tags,
      date_slots,
    }
  }
}

impl Command {
  /// New persons take the next free uid in `population`.
  fn into_mutation(self, population: &Population) -> anyhow::Result<Mutation> {
    let mutation = match self {
      Self::List(_) => anyhow::bail!("list does not change the population"),
      Self::AddPatient { contact, slots } => {
        let contact = contact.into_contact(population.next_uid());
        Mutation::Add(Person::Patient(Patient::new(contact, slots)?))
      }
      Self::AddCaregiver { contact } => {
        Mutation::Add(Person::Caregiver(contact.into_contact(population.next_uid())))
      }
      Self::Edit(args) => Mutation::Edit { uid: args.uid, edit: args.into_edit() },
      Self::Delete { uid } => Mutation::Delete { uid },
      Self::Mark(SlotArgs { uid, index }) => Mutation::Mark { uid, index },
      Self::MarkFailed(SlotArgs { uid, index }) => Mutation::MarkFailed { uid, index },
      Self::Unmark(SlotArgs { uid, index }) => Mutation::Unmark { uid, index },
      Self::Assign { target: SlotArgs { uid, index }, caregiver } => {
        Mutation::Assign { uid, index, caregiver }
      }
      Self::Unassign(SlotArgs { uid, index }) => Mutation::Unassign { uid, index },
    };
    Ok(mutation)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
