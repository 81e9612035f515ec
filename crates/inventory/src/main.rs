//! Interactive inventory manager.
//!
//! A numbered menu over the CSV-backed store. Every action reloads the
//! file, so nothing is kept in memory between actions.

use anyhow::Result;
use inventory_common::logging;
use inventory_common::prelude::*;
use inventory_store::{
    Inventory, Price, Record, SkippedRow, StoreError, ValidationError, parse_quantity,
};
use std::io::{BufRead, Write};

const MENU: &str = "
--- Inventory Manager ---
1. Add item
2. List items
3. Update item
4. Delete item
5. Exit";

fn main() -> Result<()> {
    logging::init();

    let inventory = Inventory::from_env();
    let mut input = LineInput::from_stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    run(&inventory, &mut input, &mut out)
}

/// Menu loop. Returns on "5" or end of input.
fn run<R: BufRead, W: Write>(
    inventory: &Inventory,
    input: &mut LineInput<R>,
    out: &mut W,
) -> Result<()> {
    loop {
        writeln!(out, "{}", MENU)?;
        let Some(choice) = input.prompt(out, "Choose an option: ")? else {
            writeln!(out)?;
            Notice::info("Goodbye!").write_to(out)?;
            return Ok(());
        };

        match choice.as_str() {
            "1" => add_item(inventory, input, out)?,
            "2" => list_items(inventory, out)?,
            "3" => update_item(inventory, input, out)?,
            "4" => delete_item(inventory, input, out)?,
            "5" => {
                Notice::info("Goodbye!").write_to(out)?;
                return Ok(());
            }
            _ => Notice::error("Invalid option. Please try again.").write_to(out)?,
        }
    }
}

fn warn_skipped<W: Write>(out: &mut W, skipped: &[SkippedRow]) -> Result<()> {
    for row in skipped {
        Notice::warning(format!("skipped malformed row, {}", row)).write_to(out)?;
    }
    Ok(())
}

/// Print a store failure and record it in the action log.
fn report<W: Write>(out: &mut W, action: &str, target: &str, err: &StoreError) -> Result<()> {
    let outcome = if err.is_user_condition() {
        "rejected"
    } else {
        "failed"
    };
    let message = err.to_string();
    log_action(action, target, outcome, Some(&message));
    Notice::error(message).write_to(out)?;
    Ok(())
}

fn add_item<R: BufRead, W: Write>(
    inventory: &Inventory,
    input: &mut LineInput<R>,
    out: &mut W,
) -> Result<()> {
    let Some(name) = input.prompt(out, "Item name: ")? else {
        return Ok(());
    };

    let cycle = match inventory.begin() {
        Ok(cycle) => cycle,
        Err(e) => return report(out, "add", &name, &e),
    };
    warn_skipped(out, cycle.skipped())?;

    if name.is_empty() {
        return report(out, "add", &name, &ValidationError::EmptyName.into());
    }
    // Checked before asking for the rest, and again on save.
    if cycle.find(&name).is_some() {
        report(out, "add", &name, &StoreError::Duplicate(name.clone()))?;
        Notice::info("Use 'Update item' to change it.").write_to(out)?;
        return Ok(());
    }

    let Some(quantity) = input.prompt(out, "Quantity: ")? else {
        return Ok(());
    };
    let quantity = match parse_quantity(&quantity) {
        Ok(quantity) => quantity,
        Err(e) => return report(out, "add", &name, &e.into()),
    };

    let Some(price) = input.prompt(out, "Price: ")? else {
        return Ok(());
    };
    let price = match Price::parse(&price) {
        Ok(price) => price,
        Err(e) => return report(out, "add", &name, &e.into()),
    };

    match cycle.add(Record::new(name.clone(), quantity, price)) {
        Ok(()) => {
            log_action("add", &name, "ok", None);
            Notice::success("Item added.").write_to(out)?;
        }
        Err(e) => report(out, "add", &name, &e)?,
    }
    Ok(())
}

fn list_items<W: Write>(inventory: &Inventory, out: &mut W) -> Result<()> {
    let loaded = match inventory.list() {
        Ok(loaded) => loaded,
        Err(e) => return report(out, "list", "", &e),
    };
    warn_skipped(out, &loaded.skipped)?;
    log_action("list", "", "ok", None);

    if loaded.records.is_empty() {
        Notice::info("Inventory is empty.").write_to(out)?;
        return Ok(());
    }

    let mut table = Table::new()
        .column("Name", 20)
        .column("Quantity", 10)
        .column("Price", 10);
    for record in &loaded.records {
        table.row([
            record.name.clone(),
            record.quantity.to_string(),
            record.price.to_string(),
        ]);
    }

    writeln!(out, "\n--- Current Inventory ---")?;
    write!(out, "{}", table.render())?;
    Ok(())
}

fn update_item<R: BufRead, W: Write>(
    inventory: &Inventory,
    input: &mut LineInput<R>,
    out: &mut W,
) -> Result<()> {
    let Some(name) = input.prompt(out, "Name of the item to update: ")? else {
        return Ok(());
    };

    let cycle = match inventory.begin() {
        Ok(cycle) => cycle,
        Err(e) => return report(out, "update", &name, &e),
    };
    warn_skipped(out, cycle.skipped())?;

    match cycle.find(&name) {
        Some(found) => Notice::info(format!("Found item: {}", found.name)).write_to(out)?,
        None => return report(out, "update", &name, &StoreError::NotFound(name.clone())),
    }

    let quantity = input.prompt(out, "New quantity (leave blank to keep): ")?;
    let price = input.prompt(out, "New price (leave blank to keep): ")?;

    match cycle.update(&name, quantity.as_deref(), price.as_deref()) {
        Ok(updated) => {
            for rejected in updated.rejected() {
                Notice::warning(format!("{}; left unchanged.", rejected)).write_to(out)?;
            }
            let detail = updated
                .rejected()
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            log_action(
                "update",
                &updated.name,
                "ok",
                (!detail.is_empty()).then_some(detail.as_str()),
            );
            Notice::success("Item updated.").write_to(out)?;
        }
        Err(e) => report(out, "update", &name, &e)?,
    }
    Ok(())
}

fn delete_item<R: BufRead, W: Write>(
    inventory: &Inventory,
    input: &mut LineInput<R>,
    out: &mut W,
) -> Result<()> {
    let Some(name) = input.prompt(out, "Name of the item to delete: ")? else {
        return Ok(());
    };

    let cycle = match inventory.begin() {
        Ok(cycle) => cycle,
        Err(e) => return report(out, "delete", &name, &e),
    };
    warn_skipped(out, cycle.skipped())?;

    match cycle.delete(&name) {
        Ok(removed) => {
            log_action("delete", &removed.name, "ok", None);
            Notice::success(format!("Item '{}' deleted.", removed.name)).write_to(out)?;
        }
        Err(e) => report(out, "delete", &name, &e)?,
    }
    Ok(())
}
