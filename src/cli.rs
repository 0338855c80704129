use crate::config::Config;
use crate::extras::{
    filter, group, select_all_visible, unselect_all_visible, Catalog, ExtraType, ExtrasStore,
    GroupedCatalog, ItemId, SearchQuery, SelectionBridge,
};
use crate::i18n::{humanize, Translate, SECTION_KEY};
use crate::storage::UiCache;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(name = "gearopt")]
#[command(version, about = "Pick the extras the gear optimizer may use", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Extras(ExtrasCommand),
    /// Set the profession the interactive UI opens with
    Profession { name: String },
    /// Write a config file with the default settings
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExtrasCommand {
    /// Print the current selection for an extra type
    Show { extra_type: ExtraType },
    /// Print the catalog for an extra type, filtered by an optional query
    Search {
        extra_type: ExtraType,
        query: Option<String>,
    },
    /// Select every item the query matches (all items without a query)
    Select {
        extra_type: ExtraType,
        query: Option<String>,
    },
    /// Deselect every item the query matches (all items without a query)
    Deselect {
        extra_type: ExtraType,
        query: Option<String>,
    },
    /// Select or deselect a single item by id
    Toggle {
        extra_type: ExtraType,
        id: String,
        /// Deselect instead of select
        #[arg(long)]
        off: bool,
    },
    /// Remove every selected item of an extra type
    Clear { extra_type: ExtraType },
}

/// Run a non-interactive subcommand against `bridge`, printing to `out`.
pub fn run_command<S: ExtrasStore>(
    command: ExtrasCommand,
    catalog: &Catalog,
    bridge: &mut SelectionBridge<S>,
    translations: &impl Translate,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        ExtrasCommand::Show { extra_type } => {
            let grouped = group(&catalog.records(extra_type));
            let selection = bridge.get_selection(extra_type)?;
            if selection.is_empty() {
                writeln!(out, "No {} selected.", extra_type.title())?;
                return Ok(());
            }
            writeln!(out, "{} ({} selected)", extra_type.title(), selection.len())?;
            for id in &selection {
                let label = grouped
                    .get(id)
                    .map(|item| item.display_text())
                    .unwrap_or("(not in catalog)");
                writeln!(out, "  {id}  {label}")?;
            }
        }
        ExtrasCommand::Search { extra_type, query } => {
            let visible = visible_items(catalog, extra_type, query.as_deref());
            let selection = bridge.get_selection(extra_type)?;
            print_grouped(out, &visible, &selection, translations)?;
        }
        ExtrasCommand::Select { extra_type, query } => {
            let visible = visible_items(catalog, extra_type, query.as_deref());
            let current = bridge.get_selection(extra_type)?;
            let ids = bridge.replace_deduped(extra_type, select_all_visible(&visible, &current))?;
            writeln!(out, "{} selected: {}", extra_type.title(), ids.len())?;
        }
        ExtrasCommand::Deselect { extra_type, query } => {
            let visible = visible_items(catalog, extra_type, query.as_deref());
            let current = bridge.get_selection(extra_type)?;
            let ids = bridge.replace(extra_type, unselect_all_visible(&visible, &current))?;
            writeln!(out, "{} selected: {}", extra_type.title(), ids.len())?;
        }
        ExtrasCommand::Toggle { extra_type, id, off } => {
            let id = ItemId::new(id);
            let grouped = group(&catalog.records(extra_type));
            let Some(item) = grouped.get(&id) else {
                bail!("Unknown {} item: {}", extra_type, id);
            };
            bridge.toggle(extra_type, &id, !off)?;
            let verb = if off { "Deselected" } else { "Selected" };
            writeln!(out, "{verb} {}", item.display_text())?;
        }
        ExtrasCommand::Clear { extra_type } => {
            bridge.replace(extra_type, Vec::new())?;
            writeln!(out, "Cleared {}", extra_type.title())?;
        }
    }
    Ok(())
}

/// Change the cached profession. The weapon hands are reset when it changes.
pub fn set_profession(
    cache: &mut UiCache,
    catalog: &Catalog,
    name: &str,
    out: &mut impl Write,
) -> Result<()> {
    cache.weapons.set_profession(catalog.professions(), name)?;
    writeln!(out, "Profession set to {}", humanize(name))?;
    Ok(())
}

pub fn init_config(path: &Path, force: bool, out: &mut impl Write) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save_to(path)?;
    writeln!(out, "Wrote {}", path.display())?;
    Ok(())
}

fn visible_items(catalog: &Catalog, ty: ExtraType, query: Option<&str>) -> GroupedCatalog {
    let grouped = group(&catalog.records(ty));
    filter(&grouped, &SearchQuery::new(query.unwrap_or_default()))
}

fn print_grouped(
    out: &mut impl Write,
    visible: &GroupedCatalog,
    selection: &[ItemId],
    translations: &impl Translate,
) -> Result<()> {
    if visible.item_count() == 0 {
        writeln!(out, "No matches.")?;
        return Ok(());
    }
    for section in visible.non_empty_sections() {
        writeln!(out, "{}", translations.translate(SECTION_KEY, &section.name))?;
        for item in &section.items {
            let mark = if selection.contains(&item.id) { "x" } else { " " };
            writeln!(
                out,
                "  [{mark}] {} ({})  {}",
                item.display_text(),
                item.gw2id,
                item.id
            )?;
        }
    }
    Ok(())
}
