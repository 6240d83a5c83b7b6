use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use marmat::{cli, error, logging, report, selector};
use cli::{Cli, Commands, Toggle};
use error::{MarmatError, Result};
use marmat_common::export::resolve_output_path;
use marmat_common::{Lexicon, Session, Settings, Summary, Table, DEFAULT_OUTPUT_FILE};
use std::io::IsTerminal;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("✖ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load_or_default();
    tracing::debug!(?settings, "settings loaded");

    match cli.command {
        Commands::Run {
            metadata,
            lexicon,
            id_column,
            columns,
            categories,
            all_columns,
            all_categories,
            whole_word,
            delimiter,
            output,
            no_prompt,
        } => {
            println!("📋 MaRMAT - metadata assessment\n");
            let interactive = !no_prompt && std::io::stdin().is_terminal();
            let mut session = Session::new();

            // 1. メタデータ
            println!("[1/4] Loading metadata...");
            let table = session.load_metadata(&metadata, delimiter)?;
            println!(
                "✔ {} records, {} columns",
                table.len(),
                table.headers().len()
            );
            if table.skipped_rows() > 0 {
                println!("⚠ {} malformed rows skipped", table.skipped_rows());
            }
            let headers = table.headers().to_vec();

            // 2. 辞書
            println!("[2/4] Loading lexicon...");
            let lexicon = session.load_lexicon(&lexicon)?;
            let available_categories: Vec<String> =
                lexicon.categories().into_iter().map(String::from).collect();
            println!(
                "✔ {} terms in {} categories\n",
                lexicon.len(),
                available_categories.len()
            );

            // 3. 選択
            println!("[3/4] Selecting data...");
            let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
            if let Some(id) = id_column {
                let id = selector::resolve_names(&[id], &header_refs, "identifier column")?;
                session.selection.identifier = id.into_iter().next();
            } else if interactive && columns.is_empty() && !all_columns {
                let id = selector::pick_one("Identifier column", &header_refs, 0)?;
                session.selection.identifier = Some(id);
            }

            let chosen_columns = if all_columns {
                selector::all_except(&headers, session.selection.identifier.as_deref())
            } else if !columns.is_empty() {
                selector::resolve_names(&columns, &header_refs, "columns")?
            } else if interactive {
                let candidates: Vec<&str> = header_refs
                    .iter()
                    .copied()
                    .filter(|h| Some(*h) != session.selection.identifier.as_deref())
                    .collect();
                selector::pick_many("Metadata fields to check", &candidates)?
            } else {
                Vec::new()
            };
            session.selection.set_columns(&chosen_columns);

            let category_refs: Vec<&str> = available_categories.iter().map(String::as_str).collect();
            let chosen_categories = if all_categories {
                available_categories.clone()
            } else if !categories.is_empty() {
                selector::resolve_names(&categories, &category_refs, "categories")?
            } else if interactive {
                selector::pick_many("Lexicon categories", &category_refs)?
            } else {
                Vec::new()
            };
            session.selection.set_categories(&chosen_categories);
            session.selection.mode = Commands::match_mode(whole_word);

            println!(
                "✔ id: {}, fields: {}, categories: {}, mode: {}\n",
                session.selection.identifier.as_deref().unwrap_or("-"),
                session.selection.columns.join(", "),
                session.selection.categories.join(", "),
                session.selection.mode
            );

            // 4. 照合
            println!("[4/4] Performing analysis...");
            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::with_template("  [{bar:40}] {pos:>3}%")?.progress_chars("##-"),
            );
            let analyzed = session.analyze_with_progress(|p| bar.set_position(p.percent() as u64));
            bar.finish_and_clear();

            let results = match analyzed {
                Ok(results) => results,
                Err(e) if e.is_selection_problem() => {
                    println!("⚠ {}", e);
                    println!("  Nothing was analyzed. Choose fields with --columns and categories with --categories.");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            let summary = Summary::from_results(results);

            let output_path = output
                .map(|p| resolve_output_path(&p))
                .unwrap_or_else(|| settings.default_results_dir.join(DEFAULT_OUTPUT_FILE));
            let format = session.save_results(&output_path)?;

            if summary.matches == 0 {
                println!("✔ No matches found");
            } else {
                for line in report::summary_lines(&summary) {
                    println!("{}", line);
                }
            }
            println!("✔ {} saved: {}", format, output_path.display());
            println!("\n✅ Analysis complete");
        }

        Commands::Columns { metadata, delimiter, preview } => {
            let table = Table::from_path(&metadata, delimiter)?;
            println!("{} ({} records)\n", metadata.display(), table.len());
            for line in report::preview_lines(&table, preview, 18) {
                println!("{}", line);
            }
        }

        Commands::Categories { lexicon } => {
            let lexicon = Lexicon::from_path(&lexicon)?;
            println!("{} terms\n", lexicon.len());
            for (category, count) in lexicon.category_counts() {
                println!("  {:<32} {:>6}", category, count);
            }
        }

        Commands::Config { show, popups, fullscreen, metadata_dir, lexicon_dir, results_dir } => {
            let mut settings = settings;
            let mut changed = false;

            if let Some(v) = popups {
                settings.popups_enabled = v.is_on();
                changed = true;
            }
            if let Some(v) = fullscreen {
                settings.fullscreen_enabled = v.is_on();
                changed = true;
            }
            for (slot, value) in [
                (&mut settings.default_metadata_dir, metadata_dir),
                (&mut settings.default_lexicon_dir, lexicon_dir),
                (&mut settings.default_results_dir, results_dir),
            ] {
                if let Some(dir) = value {
                    *slot = existing_dir(dir)?;
                    changed = true;
                }
            }

            if changed {
                settings.save()?;
                println!("✔ Settings saved: {}", Settings::settings_path()?.display());
            }

            if show || !changed {
                println!("Settings:");
                println!("  popups:       {}", on_off(settings.popups_enabled));
                println!("  fullscreen:   {}", on_off(settings.fullscreen_enabled));
                println!("  metadata dir: {}", settings.default_metadata_dir.display());
                println!("  lexicon dir:  {}", settings.default_lexicon_dir.display());
                println!("  results dir:  {}", settings.default_results_dir.display());
            }
        }
    }

    Ok(())
}

fn existing_dir(dir: PathBuf) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(MarmatError::Config(format!("not a directory: {}", dir.display())));
    }
    Ok(dir.canonicalize().unwrap_or(dir))
}

fn on_off(value: bool) -> &'static str {
    if value {
        Toggle::On.label()
    } else {
        Toggle::Off.label()
    }
}
