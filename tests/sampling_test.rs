use log_producer::record::{Catalog, Severity, Synthesizer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

#[test]
fn test_severity_frequencies_over_100k_records() {
    let catalog = Catalog::standard();
    let mut synth = Synthesizer::new(&catalog, StdRng::seed_from_u64(2024)).unwrap();

    let total = 100_000;
    let mut counts: HashMap<Severity, usize> = HashMap::new();
    for _ in 0..total {
        *counts.entry(synth.generate().level).or_default() += 1;
    }

    let share = |severity: Severity| counts.get(&severity).copied().unwrap_or(0) as f64 / total as f64;

    assert!((0.55..=0.65).contains(&share(Severity::Info)), "INFO {}", share(Severity::Info));
    assert!((0.01..=0.04).contains(&share(Severity::Fatal)), "FATAL {}", share(Severity::Fatal));
    assert!((0.22..=0.28).contains(&share(Severity::Warn)), "WARN {}", share(Severity::Warn));
    assert!((0.065..=0.095).contains(&share(Severity::Error)), "ERROR {}", share(Severity::Error));
    assert!((0.04..=0.06).contains(&share(Severity::Debug)), "DEBUG {}", share(Severity::Debug));
}

#[test]
fn test_applications_are_chosen_uniformly() {
    let catalog = Catalog::standard();
    let mut synth = Synthesizer::new(&catalog, StdRng::seed_from_u64(77)).unwrap();

    let total = 50_000;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..total {
        *counts.entry(synth.generate().application.name).or_default() += 1;
    }

    assert_eq!(counts.len(), 5);
    for (name, count) in counts {
        let share = count as f64 / total as f64;
        assert!((0.18..=0.22).contains(&share), "{} {}", name, share);
    }
}

#[test]
fn test_trace_ids_do_not_repeat() {
    let catalog = Catalog::standard();
    let mut synth = Synthesizer::new(&catalog, StdRng::seed_from_u64(8)).unwrap();

    let mut seen = std::collections::HashSet::new();
    for _ in 0..50_000 {
        assert!(seen.insert(synth.generate().trace_id));
    }
}
