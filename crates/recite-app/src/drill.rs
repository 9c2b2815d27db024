use std::io::{self, BufRead, Write};

use recite_types::{Unit, WordItem};
use recite_words::WrongWordStore;

pub struct DrillOutcome {
    pub total: usize,
    pub correct: usize,
    pub missed: Vec<String>,
}

/// Flatten a unit into drillable words. Sentence units drill whole
/// sentences; the sentence text doubles as the answer key.
pub fn unit_words(unit: &Unit) -> Vec<WordItem> {
    match unit {
        Unit::Word { words, .. } | Unit::WrongWords { words, .. } => words.clone(),
        Unit::Sentence { words, .. } => words
            .iter()
            .flat_map(|section| &section.data)
            .map(|s| WordItem {
                name: s.sentence.clone(),
                description: s.description.clone(),
                owner: None,
            })
            .collect(),
    }
}

/// Present each word's description and grade the typed answer against its
/// name. Ends early on EOF.
///
/// In a normal drill a miss enters the owner's retry pool (streak reset);
/// when drilling the pool itself (`retry_pool`) a miss decrements the streak
/// instead. Correct answers advance the streak of tracked words either way.
pub fn run_drill(
    words: &[WordItem],
    owner: &str,
    store: &WrongWordStore,
    retry_pool: bool,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<DrillOutcome> {
    let mut outcome = DrillOutcome {
        total: words.len(),
        correct: 0,
        missed: Vec::new(),
    };

    let mut lines = input.lines();
    for (i, word) in words.iter().enumerate() {
        writeln!(output, "[{}/{}] {}", i + 1, outcome.total, word.description)?;
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            outcome.total = i;
            break;
        };
        let answer = line?;

        if answer.trim() == word.name {
            outcome.correct += 1;
            store.update_correct_count(owner, &word.name, true);
            writeln!(output, "correct")?;
        } else {
            outcome.missed.push(word.name.clone());
            if retry_pool {
                store.update_correct_count(owner, &word.name, false);
            } else {
                store.add_wrong_word(word, owner);
            }
            writeln!(output, "wrong, it was: {}", word.name)?;
        }
    }

    writeln!(
        output,
        "done: {}/{} correct, {} for retry",
        outcome.correct,
        outcome.total,
        outcome.missed.len()
    )?;

    Ok(outcome)
}
