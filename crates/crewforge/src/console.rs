//! Colorful console output for planning runs.
//!
//! Provides a custom `tracing` layer that formats planner events with colors.
//! Installed on the first [`plan_habitat`](crate::plan_habitat) call when the
//! `console` feature is enabled.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes the planner console output.
///
/// Safe to call multiple times; only the first call has effect. A global
/// subscriber installed elsewhere wins and is left alone.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "crewforge_solver=info".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(PlannerConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let banner = r#"
  ____                    _____
 / ___|_ __ _____      __|  ___|__  _ __ __ _  ___
| |   | '__/ _ \ \ /\ / /| |_ / _ \| '__/ _` |/ _ \
| |___| | |  __/\ V  V / |  _| (_) | | | (_| |  __/
 \____|_|  \___| \_/\_/  |_|  \___/|_|  \__, |\___|
                                        |___/
"#;

    let version_line = format!(
        "                 v{} - Habitat Crew Planner\n",
        env!("CARGO_PKG_VERSION")
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats planner events with colors.
pub struct PlannerConsoleLayer;

impl<S: Subscriber> Layer<S> for PlannerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("crewforge_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = if *metadata.level() == Level::WARN {
            format_warning(&visitor)
        } else {
            format_planner_event(&visitor)
        };
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    phase: Option<String>,
    phase_index: Option<u64>,
    duration_ms: Option<u64>,
    steps: Option<u64>,
    moves_evaluated: Option<u64>,
    moves_accepted: Option<u64>,
    workers: Option<u64>,
    stations: Option<u64>,
    items: Option<u64>,
    morale: Option<f64>,
    passes: Option<u64>,
    swaps: Option<u64>,
    bindings: Option<u64>,
    relocated: Option<u64>,
    allocated: Option<u64>,
    leftover: Option<u64>,
    unused: Option<u64>,
    outcome: Option<String>,
    strategy: Option<String>,
    overall_initial: Option<String>,
    overall_final: Option<String>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "message" => self.message = Some(s),
            "overall_initial" => self.overall_initial = Some(unwrap_some(&s)),
            "overall_final" => self.overall_final = Some(unwrap_some(&s)),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "phase_index" => self.phase_index = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "steps" => self.steps = Some(value),
            "moves_evaluated" => self.moves_evaluated = Some(value),
            "moves_accepted" => self.moves_accepted = Some(value),
            "workers" => self.workers = Some(value),
            "stations" => self.stations = Some(value),
            "items" => self.items = Some(value),
            "passes" => self.passes = Some(value),
            "swaps" => self.swaps = Some(value),
            "bindings" => self.bindings = Some(value),
            "relocated" => self.relocated = Some(value),
            "allocated" => self.allocated = Some(value),
            "leftover" => self.leftover = Some(value),
            "unused" => self.unused = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "morale" {
            self.morale = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "phase" => self.phase = Some(value.to_string()),
            "outcome" => self.outcome = Some(value.to_string()),
            "strategy" => self.strategy = Some(value.to_string()),
            _ => {}
        }
    }
}

/// `Some(27.5)` -> `27.5`, `None` -> `n/a`.
fn unwrap_some(debug: &str) -> String {
    debug
        .strip_prefix("Some(")
        .and_then(|s| s.strip_suffix(')'))
        .map_or_else(|| "n/a".to_string(), str::to_string)
}

fn format_planner_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "plan_start" => format_plan_start(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "balance_end" => format_balance_end(v),
        "equipment_end" => format_equipment_end(v),
        "plan_end" => format_plan_end(v),
        _ => String::new(),
    }
}

fn format_plan_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} worker count ({}), station count ({}), item count ({}), morale ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Planner]".bright_cyan(),
        v.workers.unwrap_or(0).to_formatted_string(&Locale::en).bright_yellow(),
        v.stations.unwrap_or(0).to_formatted_string(&Locale::en).bright_yellow(),
        v.items.unwrap_or(0).to_formatted_string(&Locale::en).bright_yellow(),
        format!("{:.2}", v.morale.unwrap_or(0.0)).bright_magenta()
    )
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");

    format!(
        "{} {} {} {} phase ({}) started",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", phase).bright_cyan(),
        phase.white().bold(),
        v.phase_index.unwrap_or(0).to_string().yellow()
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");

    format!(
        "{} {} {} {} phase ({}) ended: time spent ({}), moves accepted ({}/{}), step total ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", phase).bright_cyan(),
        phase.white().bold(),
        v.phase_index.unwrap_or(0).to_string().yellow(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        v.moves_accepted.unwrap_or(0).to_formatted_string(&Locale::en).bright_magenta().bold(),
        v.moves_evaluated.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.steps.unwrap_or(0).to_formatted_string(&Locale::en).white()
    )
}

fn format_balance_end(v: &EventVisitor) -> String {
    let outcome = v.outcome.as_deref().unwrap_or("unknown");
    let colored = if outcome == "converged" {
        outcome.bright_green().to_string()
    } else {
        outcome.yellow().to_string()
    };

    format!(
        "    {} {} after {} passes, {} swaps",
        "->".bright_blue(),
        colored,
        v.passes.unwrap_or(0).to_string().white(),
        v.swaps.unwrap_or(0).to_formatted_string(&Locale::en).white()
    )
}

fn format_equipment_end(v: &EventVisitor) -> String {
    format!(
        "    {} {}: relocated {}, allocated {}, leftover {}, unused {}",
        "->".bright_blue(),
        v.strategy.as_deref().unwrap_or("unknown").white(),
        v.relocated.unwrap_or(0).to_string().white(),
        v.allocated.unwrap_or(0).to_string().bright_green(),
        v.leftover.unwrap_or(0).to_string().white(),
        v.unused.unwrap_or(0).to_string().yellow()
    )
}

fn format_plan_end(v: &EventVisitor) -> String {
    let initial = v.overall_initial.as_deref().unwrap_or("n/a");
    let final_time = v.overall_final.as_deref().unwrap_or("n/a");

    let mut output = format!(
        "{} {} {} Planning ended: time spent ({}), overall average ({} -> {})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Planner]".bright_cyan(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        initial.white(),
        final_time.bright_green().bold()
    );

    output.push_str("\n\n");
    output.push_str(&"╔══════════════════════════════════════════════════════════╗".bright_cyan().to_string());
    output.push('\n');
    for (label, value) in [
        ("Initial average:", format!("{}s", initial)),
        ("Final average:", format!("{}s", final_time)),
        ("Swaps:", v.swaps.unwrap_or(0).to_formatted_string(&Locale::en)),
        ("Items bound:", v.bindings.unwrap_or(0).to_formatted_string(&Locale::en)),
        ("Balancing:", v.outcome.clone().unwrap_or_default()),
    ] {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }
    output.push_str(&"╚══════════════════════════════════════════════════════════╝".bright_cyan().to_string());
    output.push('\n');

    output
}

fn format_warning(v: &EventVisitor) -> String {
    let event = v.event.as_deref().unwrap_or("warning");
    let message = v.message.as_deref().unwrap_or("").trim_matches('"');

    format!(
        "{} {} {} {}",
        timestamp().bright_black(),
        "WARN".bright_yellow(),
        format!("[{}]", event).bright_cyan(),
        message
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
