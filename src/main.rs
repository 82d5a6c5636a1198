use anyhow::Context;
use clap::Parser;
use site_widgets::config::cli::{Command, ConsentAction, PageArgs};
use site_widgets::core::page::{CATEGORY_META, SERIES_META, TAGS_META};
use site_widgets::core::report::{self, OutputFormat};
use site_widgets::utils::error::ErrorSeverity;
use site_widgets::utils::{logger, validation::Validate};
use site_widgets::{
    BreadcrumbBuilder, CliConfig, ConsentManager, CookieJar, FallbackStore, FileStore,
    HtmlPageContext, PageMeta, PageView, RelevanceResolver, Section, SiteConfig, SiteError,
    StaticPageContext,
};
use std::path::PathBuf;

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli) {
        match e.downcast_ref::<SiteError>() {
            Some(site_error) => {
                tracing::error!(
                    "❌ {} (Category: {:?}, Severity: {:?})",
                    site_error,
                    site_error.category(),
                    site_error.severity()
                );
                eprintln!("❌ {}", site_error.user_friendly_message());
                eprintln!("💡 Suggestion: {}", site_error.recovery_suggestion());

                // 根據錯誤嚴重程度決定退出碼
                let exit_code = match site_error.severity() {
                    ErrorSeverity::Low => 0,
                    ErrorSeverity::Medium => 2,
                    ErrorSeverity::High => 1,
                    ErrorSeverity::Critical => 3,
                };
                if exit_code > 0 {
                    std::process::exit(exit_code);
                }
            }
            None => {
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run(cli: CliConfig) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            SiteConfig::from_file(path)?
        }
        None => SiteConfig::default(),
    };

    // 應用命令列覆蓋設定
    if let Some(catalog) = &cli.catalog {
        config.catalog.path = Some(catalog.clone());
    }
    config.validate()?;

    match cli.command {
        Command::Related { page, scope } => {
            let resolver = build_resolver(&config)?;
            let meta = page_meta(&page)?;
            let related = resolver.find_related_content(&meta, scope);
            print_output(&report::render_rows(&report::ranked_rows(&related), cli.format)?);
        }
        Command::Services { page } => {
            let resolver = build_resolver(&config)?;
            let meta = page_meta(&page)?;
            let services = resolver.find_related_services(&meta);
            let rows = report::record_rows(Section::Services, &services);
            print_output(&report::render_rows(&rows, cli.format)?);
        }
        Command::Curated { page } => {
            let resolver = build_resolver(&config)?;
            let meta = page_meta(&page)?;
            let curated = resolver.find_curated_related(&meta);
            let section = Section::parse(&meta.section).unwrap_or(Section::Pages);
            let rows = report::record_rows(section, &curated);
            print_output(&report::render_rows(&rows, cli.format)?);
        }
        Command::Nav { page } => {
            let resolver = build_resolver(&config)?;
            let meta = page_meta(&page)?;
            let nav = resolver.find_prev_next(&meta);
            print_output(&report::render_rows(&report::navigation_rows(&nav), cli.format)?);
        }
        Command::View { page } => {
            let resolver = build_resolver(&config)?;
            let view = PageView::assemble(&resolver, page_meta(&page)?);
            print_view(&view, cli.format)?;
        }
        Command::Breadcrumbs { path, full } => {
            let builder = BreadcrumbBuilder::new(config.breadcrumbs.clone());
            let crumbs = if full {
                builder.build(&path)
            } else {
                builder.display_trail(&path)
            };
            match cli.format {
                OutputFormat::Json => print_output(&serde_json::to_string_pretty(&crumbs)?),
                OutputFormat::Csv => {
                    let rows = report::breadcrumb_rows(&crumbs);
                    print_output(&report::render_rows(&rows, OutputFormat::Csv)?);
                }
                _ if full => {
                    let separator = format!(" {} ", builder.settings().separator);
                    let labels: Vec<&str> = crumbs.iter().map(|c| c.label.as_str()).collect();
                    print_output(&labels.join(&separator));
                }
                _ => print_output(&builder.render_text(&path)),
            }
        }
        Command::Consent { action, store } => {
            let mut settings = config.consent.clone();
            if let Some(store) = store {
                settings.store_path = store;
            }
            run_consent(action, settings, cli.format)?;
        }
    }

    Ok(())
}

fn build_resolver(config: &SiteConfig) -> anyhow::Result<RelevanceResolver> {
    let catalog = config.load_catalog()?;
    tracing::debug!("Catalog holds {} records", catalog.len());
    Ok(RelevanceResolver::new(catalog, config.related.clone()))
}

fn page_meta(page: &PageArgs) -> anyhow::Result<PageMeta> {
    if let Some(html_path) = &page.html {
        let html = std::fs::read_to_string(html_path)
            .with_context(|| format!("reading page HTML from {}", html_path))?;
        return Ok(PageMeta::from_context(&HtmlPageContext::parse(&page.path, &html)));
    }

    let mut context = StaticPageContext::new(&page.path);
    for (name, value) in [
        (TAGS_META, &page.tags),
        (CATEGORY_META, &page.category),
        (SERIES_META, &page.series),
    ] {
        if let Some(value) = value {
            context = context.with_meta(name, value);
        }
    }
    if let Some(title) = &page.title {
        context = context.with_title(title);
    }
    Ok(PageMeta::from_context(&context))
}

fn run_consent(
    action: ConsentAction,
    settings: site_widgets::core::consent::ConsentSettings,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let primary = FileStore::new(&settings.store_path);
    let cookie_path = PathBuf::from(&settings.store_path).with_extension("cookies");
    let secondary = CookieJar::open(&cookie_path).unwrap_or_else(|e| {
        tracing::warn!("Cookie jar unavailable ({}), keeping cookies in memory", e);
        CookieJar::new()
    });

    let mut manager = ConsentManager::new(FallbackStore::new(primary, secondary), settings);
    let record = match action {
        ConsentAction::Status => manager.status(),
        ConsentAction::Accept => Some(manager.record_choice(true, chrono::Utc::now())),
        ConsentAction::Decline => Some(manager.record_choice(false, chrono::Utc::now())),
        ConsentAction::Reset => {
            manager.reset();
            None
        }
    };

    print_output(&report::render_consent(record.as_ref(), format)?);
    Ok(())
}

fn print_view(view: &PageView<'_>, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        print_output(&serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!("# You might also like");
    print_output(&report::render_rows(&report::ranked_rows(&view.related), format)?);

    if !view.curated.is_empty() {
        println!("\n# Related in this section");
        let section = Section::parse(&view.meta.section).unwrap_or(Section::Pages);
        let rows = report::record_rows(section, &view.curated);
        print_output(&report::render_rows(&rows, format)?);
    }

    if let Some(nav) = &view.navigation {
        println!("\n# Navigation");
        print_output(&report::render_rows(&report::navigation_rows(nav), format)?);
    }

    if let Some(services) = &view.services {
        println!("\n# Ready to implement this?");
        let rows = report::record_rows(Section::Services, services);
        print_output(&report::render_rows(&rows, format)?);
    }
    Ok(())
}

fn print_output(output: &str) {
    println!("{}", output.trim_end_matches('\n'));
}
