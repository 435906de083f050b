//! `dynvar` CLI: evaluate operators and inspect values from the command line.
//!
//! Operands are JSON literals. A `--lhs-tag`/`--rhs-tag` converts an operand
//! to a specific width or kind before the operator runs.
//!
//! ## Usage
//!
//! ```sh
//! # Same-width arithmetic under the default (throw) policy
//! dynvar eval add 4000000000 1 --lhs-tag u32 --rhs-tag u32
//!
//! # Widen instead of failing
//! dynvar eval + 4294967295 1 --lhs-tag u32 --rhs-tag u32 --policy promote
//!
//! # Heap operands
//! dynvar eval '*' '"ab"' 3
//! dynvar eval sub '[1,2,3,2]' '[2]'
//! dynvar eval '|' '[1,2]' '[2,3]' --lhs-tag set --rhs-tag set
//!
//! # Describe a value, or re-emit it as JSON
//! dynvar inspect '{"b":1,"a":[true,null]}'
//! dynvar inspect '[1,2,2]' --tag set --json
//! ```
//!
//! Set `RUST_LOG=debug` to see dispatch and promotion traces on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dynvar_core::{BinaryOp, Policy, Tag, Value};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "dynvar",
    version,
    about = "Evaluate and inspect dynamically-typed values"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a binary operator to two JSON operands
    Eval {
        /// Operator name (add, floordiv, bitand, ...) or symbol (+, //, ==, &, ...)
        #[arg(allow_hyphen_values = true)]
        op: BinaryOp,
        /// Left operand as a JSON literal
        #[arg(allow_hyphen_values = true)]
        lhs: String,
        /// Right operand as a JSON literal
        #[arg(allow_hyphen_values = true)]
        rhs: String,
        /// Overflow policy: throw, promote, wrap or raw_no_check
        #[arg(short, long, default_value = "throw")]
        policy: Policy,
        /// Convert the left operand to this type first (u32, i64, f32, set, ...)
        #[arg(long)]
        lhs_tag: Option<Tag>,
        /// Convert the right operand to this type first
        #[arg(long)]
        rhs_tag: Option<Tag>,
    },
    /// Describe a JSON value: type, truthiness, length and display form
    Inspect {
        /// The value as a JSON literal
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Convert the value to this type first
        #[arg(long)]
        tag: Option<Tag>,
        /// Print the value as compact JSON instead of a description
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            op,
            lhs,
            rhs,
            policy,
            lhs_tag,
            rhs_tag,
        } => {
            let a = parse_operand(&lhs, lhs_tag).context("Failed to read left operand")?;
            let b = parse_operand(&rhs, rhs_tag).context("Failed to read right operand")?;
            debug!(%op, left = %a.tag(), right = %b.tag(), %policy, "evaluating");

            let result = a
                .apply(op, &b, policy)
                .with_context(|| format!("Failed to evaluate {} {} {}", a.repr(), op, b.repr()))?;
            println!("{} ({})", result, result.tag());
        }
        Commands::Inspect { value, tag, json } => {
            let v = parse_operand(&value, tag).context("Failed to read value")?;
            if json {
                println!("{}", v.to_json_string());
            } else {
                print!("{}", describe(&v));
            }
        }
    }

    Ok(())
}

/// Parse a JSON literal, then convert it when a tag was requested.
fn parse_operand(text: &str, tag: Option<Tag>) -> Result<Value> {
    let value =
        Value::from_json_str(text).with_context(|| format!("'{}' is not a JSON literal", text))?;
    match tag {
        Some(target) => value
            .convert(target)
            .with_context(|| format!("Cannot convert {} to {}", value.repr(), target)),
        None => Ok(value),
    }
}

fn describe(value: &Value) -> String {
    let mut out = format!("type:    {}\n", value.tag());
    out.push_str(&format!("truthy:  {}\n", value.truthy()));
    if let Ok(len) = value.len() {
        out.push_str(&format!("length:  {}\n", len));
    }
    out.push_str(&format!("display: {}\n", value));
    out
}
