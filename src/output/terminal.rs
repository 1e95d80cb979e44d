// Colored terminal output for feature lists and evaluation scores.

use colored::Colorize;

use crate::evaluation::report::EvaluationReport;
use crate::features::selection::FeatureSet;
use crate::features::vocabulary::Vocabulary;
use crate::output::truncate_chars;

/// Display the top `limit` selected unigrams and bigrams with their counts.
pub fn display_features(vocabulary: &Vocabulary, features: &FeatureSet, limit: usize) {
    println!(
        "\n{}",
        format!(
            "=== Vocabulary ({} documents, {} count policy) ===",
            vocabulary.documents, vocabulary.policy
        )
        .bold()
    );
    println!(
        "  {} distinct unigrams, {} distinct bigrams, {} tokens",
        vocabulary.unigrams.len(),
        vocabulary.bigrams.len(),
        vocabulary.unigrams.total()
    );

    println!(
        "\n{}",
        format!("Unigram features ({})", features.unigrams.len()).bold()
    );
    println!("  {:>5}  {:<28} {:>10}", "Rank".dimmed(), "Word".dimmed(), "Count".dimmed());
    for (i, word) in features.unigrams.iter().take(limit).enumerate() {
        println!(
            "  {:>5}. {:<28} {:>10}",
            i + 1,
            truncate_chars(word, 25),
            vocabulary.unigrams.get(word.as_str())
        );
    }
    if features.unigrams.len() > limit {
        println!("  {}", format!("... {} more", features.unigrams.len() - limit).dimmed());
    }

    println!(
        "\n{}",
        format!("Bigram features ({})", features.bigrams.len()).bold()
    );
    println!("  {:>5}  {:<28} {:>10}", "Rank".dimmed(), "Pair".dimmed(), "Count".dimmed());
    for (i, pair) in features.bigrams.iter().take(limit).enumerate() {
        println!(
            "  {:>5}. {:<28} {:>10}",
            i + 1,
            truncate_chars(&format!("{} {}", pair.0, pair.1), 25),
            vocabulary.bigrams.get(pair)
        );
    }
    if features.bigrams.len() > limit {
        println!("  {}", format!("... {} more", features.bigrams.len() - limit).dimmed());
    }
}

/// Display per-fold scores with mean and spread.
pub fn display_report(report: &EvaluationReport) {
    println!(
        "\n{}",
        format!("=== Cross-validation ({} folds) ===", report.folds()).bold()
    );
    println!("  Source:   {}", report.source);
    println!(
        "  Features: {} unigrams + {} bigrams ({} counts, {} case)",
        report.unigram_features, report.bigram_features, report.count_policy, report.case_mode
    );
    println!("  Documents: {}", report.documents);
    println!();

    for (i, score) in report.scores.iter().enumerate() {
        println!("  Fold {:>2}  {}", i + 1, colorize_score(*score));
    }

    println!("  {}", "-".repeat(24).dimmed());
    println!(
        "  Mean     {}  (± {:.3})",
        colorize_score(report.mean()),
        report.std_dev()
    );
}

/// Color a 0..1 accuracy by how far it is from a coin flip.
fn colorize_score(score: f64) -> String {
    let text = format!("{score:.3}");
    if score >= 0.7 {
        text.green().bold().to_string()
    } else if score >= 0.55 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}
