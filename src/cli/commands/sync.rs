use crate::cli::parser::RemoteAction;
use crate::context::AppContext;
use crate::core::sync::SyncEngine;
use crate::errors::AppResult;
use crate::remote::GistStore;
use crate::ui::messages::{detail, header, info, success, sync_step, warning};
use crate::utils::date::format_local;
use crate::utils::table::Table;
use chrono::DateTime;

const TOKEN_ENV: &str = "RHOUSEKEEP_GIST_TOKEN";

fn gist_store(ctx: &AppContext) -> AppResult<GistStore> {
    let token = ctx
        .config
        .gist_token
        .clone()
        .or_else(|| std::env::var(TOKEN_ENV).ok());
    GistStore::new(token)
}

pub fn handle_sync(ctx: &mut AppContext) -> AppResult<()> {
    let mut remote = gist_store(ctx)?;
    let mut engine = SyncEngine::new();

    sync_step(format!("Syncing {} pending change(s)…", ctx.ledger.count()));
    let report = engine.sync(ctx, &mut remote)?;

    let i = report.imported;
    detail(format!(
        "Remote: {} trackable(s), {} completion(s), {} grocery item(s), {} expense(s)",
        i.trackables, i.completions, i.groceries, i.expenses
    ));
    if report.replayed > 0 {
        detail(format!("Replayed {} local change(s)", report.replayed));
    }
    for f in &report.failures {
        warning(format!("Dropped {}: {}", f.change_id, f.reason));
    }

    if report.pushed {
        success(format!("Sync complete, remote {} updated", report.remote_id));
    } else {
        success("Already in sync, nothing pushed");
    }
    Ok(())
}

pub fn handle_remote(action: &RemoteAction, ctx: &mut AppContext) -> AppResult<()> {
    match action {
        RemoteAction::Publish => {
            let mut remote = gist_store(ctx)?;
            let id = SyncEngine::new().publish(ctx, &mut remote)?;
            success(format!("Published local state to gist {}", id));
        }

        RemoteAction::Pull { discard } => {
            let mut remote = gist_store(ctx)?;
            let summary = SyncEngine::new().pull(ctx, &mut remote, *discard)?;
            success(format!(
                "Pulled {} trackable(s), {} completion(s), {} grocery item(s), {} expense(s)",
                summary.trackables, summary.completions, summary.groceries, summary.expenses
            ));
        }

        RemoteAction::Status => {
            let status = SyncEngine::status(ctx);
            header("Sync status");
            match &status.remote_id {
                Some(id) => info(format!("Remote gist: {}", id)),
                None => warning("No remote configured (run `remote publish`)"),
            }
            info(format!("Pending changes: {}", status.pending));
            match status.last_synced {
                Some(at) => info(format!("Last synced: {}", format_local(at))),
                None => info("Never synced"),
            }
        }

        RemoteAction::Changes => {
            let changes = ctx.ledger.changes();
            if changes.is_empty() {
                info("No pending changes");
                return Ok(());
            }

            let mut table = Table::new(&["Change", "Entity", "Action", "When"]);
            for c in &changes {
                let when = DateTime::from_timestamp_millis(c.timestamp)
                    .map(format_local)
                    .unwrap_or_else(|| c.timestamp.to_string());
                table.add_row(vec![
                    c.id.clone(),
                    c.entity_type.to_string(),
                    c.change_type.as_str().to_string(),
                    when,
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
