//! End-to-end scenarios against the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use user_script_factory::script::template::unresolved_placeholders;
use user_script_factory::{
    DomainUserScript, EmbeddedLoader, FarblingParams, RandomManager, RawSource, ScriptFactory,
    ScriptType, SourceLoader, SourceType,
};

// ============================================================================
// Helpers
// ============================================================================

/// Embedded loader that counts reads per call.
#[derive(Default)]
struct CountingLoader {
    calls: AtomicUsize,
}

impl SourceLoader for CountingLoader {
    fn load(&self, source_type: SourceType) -> user_script_factory::Result<RawSource> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        EmbeddedLoader.load(source_type)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn counting_factory() -> Result<(Arc<CountingLoader>, ScriptFactory)> {
    init_tracing();
    let loader = Arc::new(CountingLoader::default());
    let factory = ScriptFactory::builder()
        .loader(Arc::clone(&loader))
        .build()?;
    Ok((loader, factory))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn archive_script_is_raw_template_loaded_once() -> Result<()> {
    let (loader, factory) = counting_factory()?;
    let script_type = ScriptType::domain(DomainUserScript::Archive);

    let first = factory.build(&script_type)?;
    let second = factory.build(&script_type)?;

    assert_eq!(first.source().as_bytes(), second.source().as_bytes());
    assert_eq!(
        first.source(),
        EmbeddedLoader::template(SourceType::Archive)
    );
    assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn farbling_differs_per_domain_and_is_cached() -> Result<()> {
    let (_, factory) = counting_factory()?;

    let example = factory.build(&ScriptType::farbling_protection("example.com"))?;
    let other = factory.build(&ScriptType::farbling_protection("other.com"))?;
    let example_again = factory.build(&ScriptType::farbling_protection("example.com"))?;

    assert_ne!(example.source(), other.source());
    assert!(Arc::ptr_eq(&example, &example_again));
    assert_eq!(factory.stats().script_builds, 2);
    Ok(())
}

#[test]
fn farbling_params_differ_per_domain() {
    let manager = RandomManager::new();
    let example = FarblingParams::derive(&manager, "example.com");
    let other = FarblingParams::derive(&manager, "other.com");

    assert_ne!(example.fudge_factor, other.fudge_factor);
    assert_ne!(example.fake_plugin_data, other.fake_plugin_data);
}

#[test]
fn every_source_loads_exactly_once() -> Result<()> {
    let (loader, factory) = counting_factory()?;

    for _ in 0..3 {
        for source_type in SourceType::ALL {
            factory.source(source_type)?;
        }
    }

    assert_eq!(loader.calls.load(Ordering::SeqCst), SourceType::ALL.len());
    Ok(())
}

#[test]
fn no_placeholders_survive_any_build() -> Result<()> {
    let (_, factory) = counting_factory()?;

    let mut script_types = vec![
        ScriptType::Nacl,
        ScriptType::farbling_protection("example.com"),
    ];
    script_types.extend(DomainUserScript::ALL.map(ScriptType::from));

    for script_type in script_types {
        let script = factory.build(&script_type)?;
        assert!(
            unresolved_placeholders(script.source()).is_empty(),
            "{script_type}"
        );
    }
    Ok(())
}

#[test]
fn clear_all_triggers_one_fresh_load_and_build() -> Result<()> {
    let (loader, factory) = counting_factory()?;
    let script_type = ScriptType::domain(DomainUserScript::YoutubeAdBlock);

    factory.build(&script_type)?;
    factory.clear_all();

    let loads_before = loader.calls.load(Ordering::SeqCst);
    let builds_before = factory.stats().script_builds;

    factory.build(&script_type)?;
    factory.build(&script_type)?;

    assert_eq!(loader.calls.load(Ordering::SeqCst) - loads_before, 1);
    assert_eq!(factory.stats().script_builds - builds_before, 1);
    Ok(())
}

#[test]
fn independent_factories_do_not_share_state() -> Result<()> {
    let a = ScriptFactory::new();
    let b = ScriptFactory::new();
    let script_type = ScriptType::farbling_protection("example.com");

    assert_ne!(a.security_token(), b.security_token());
    assert_ne!(a.build(&script_type)?.source(), b.build(&script_type)?.source());
    assert_eq!(b.stats().cache_hits, 0);
    Ok(())
}

#[test]
fn page_scripts_are_built_in_injection_order() -> Result<()> {
    let factory = ScriptFactory::new();
    let url = url::Url::parse("https://talk.brave.com/room")?;

    let script_types = ScriptType::for_page(&url, Some("brave.com"));
    let scripts = factory.build_all(script_types.clone())?;

    assert_eq!(script_types[0], ScriptType::Nacl);
    assert_eq!(scripts.len(), 3);
    assert!(scripts[2].main_frame_only());
    assert!(scripts[2].source().contains(factory.security_token().as_str()));
    Ok(())
}

#[test]
fn concurrent_builds_converge_on_one_script() -> Result<()> {
    let (_, factory) = counting_factory()?;
    let script_type = ScriptType::farbling_protection("example.com");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let factory = factory.clone();
            let script_type = script_type.clone();
            std::thread::spawn(move || factory.build(&script_type))
        })
        .collect();

    let mut scripts = Vec::new();
    for handle in handles {
        let script = handle
            .join()
            .map_err(|_| anyhow::anyhow!("builder thread panicked"))??;
        scripts.push(script);
    }

    let cached = factory.build(&script_type)?;
    assert!(scripts.iter().all(|s| s.source() == cached.source()));
    assert_eq!(factory.stats().cached_scripts, 1);
    Ok(())
}
