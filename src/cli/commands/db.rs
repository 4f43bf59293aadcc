use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::db::initialize::init_db;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{detail, error, info, success};

pub fn handle(cmd: &Commands, ctx: &mut AppContext) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    if *migrate {
        // opening the context already migrated; this reports the state
        match init_db(&ctx.pool.conn)? {
            0 => info("Schema is up to date."),
            n => success(format!("{} migration(s) applied.", n)),
        }
    }

    if *show_info {
        let db_path = ctx.config.database.clone();
        stats::print_db_info(&mut ctx.pool, &db_path)?;
    }

    if *check {
        info("Running integrity check…");
        let problems = stats::integrity_problems(&ctx.pool)?;
        if problems.is_empty() {
            success("Integrity check passed.");
        } else {
            error(format!("Integrity check found {} problem(s):", problems.len()));
            for p in &problems {
                detail(p);
            }
        }
    }

    if *vacuum {
        info("Running VACUUM…");
        let (before, after) = stats::vacuum(&ctx.pool, &ctx.config.database)?;
        success(format!(
            "Vacuum completed ({} KB → {} KB).",
            before / 1024,
            after / 1024
        ));
    }

    Ok(())
}
