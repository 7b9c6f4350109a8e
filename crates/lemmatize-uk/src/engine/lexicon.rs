// Dictionary lexicon backend.
//
// A plain-text table of word forms and their lemmas, one form per line:
//
//   дому<TAB>дім<TAB>дома
//   # comment
//
// Lemmas keep file order, which is the ranking handed to the session. A form
// listed on several lines accumulates its lemmas in order of appearance.
// Forms are matched case-insensitively.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hashbrown::HashMap;
use lemmatize_core::{AnalysisError, Analyzer, Candidate, InitError};

use super::MorphEngine;

/// In-memory form-to-lemmas table.
#[derive(Debug, Default)]
pub struct LexiconEngine {
    entries: HashMap<String, Vec<String>>,
}

impl LexiconEngine {
    /// Load a lexicon file.
    pub fn open(path: &Path) -> Result<Self, InitError> {
        let file = File::open(path)
            .map_err(|e| InitError::ImportFailed(format!("{}: {e}", path.display())))?;
        let engine = Self::from_reader(BufReader::new(file))
            .map_err(|e| match e {
                InitError::ConstructFailed(msg) => {
                    InitError::ConstructFailed(format!("{}: {msg}", path.display()))
                }
                other => other,
            })?;
        log::info!(
            "loaded lexicon {} ({} forms)",
            path.display(),
            engine.len()
        );
        Ok(engine)
    }

    /// Parse lexicon text from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, InitError> {
        let mut entries: HashMap<String, Vec<String>> = HashMap::new();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line
                .map_err(|e| InitError::ConstructFailed(format!("line {line_no}: {e}")))?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t').map(str::trim);
            let form = fields.next().unwrap_or_default();
            let lemmas: Vec<String> = fields
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            if form.is_empty() || lemmas.is_empty() {
                return Err(InitError::ConstructFailed(format!(
                    "line {line_no}: expected form<TAB>lemma"
                )));
            }

            entries.entry(form.to_lowercase()).or_default().extend(lemmas);
        }

        Ok(Self { entries })
    }

    /// Parse lexicon text held in memory.
    pub fn parse(text: &str) -> Result<Self, InitError> {
        Self::from_reader(text.as_bytes())
    }

    /// Number of distinct word forms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Analyzer for LexiconEngine {
    fn analyze(&self, word: &str) -> Result<Vec<Candidate>, AnalysisError> {
        let lemmas = match self.entries.get(word) {
            Some(lemmas) => lemmas,
            None => match self.entries.get(word.to_lowercase().as_str()) {
                Some(lemmas) => lemmas,
                None => return Ok(Vec::new()),
            },
        };
        Ok(lemmas.iter().map(Candidate::new).collect())
    }
}

impl MorphEngine for LexiconEngine {
    fn name(&self) -> &'static str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemmas(engine: &LexiconEngine, word: &str) -> Vec<String> {
        engine
            .analyze(word)
            .unwrap()
            .into_iter()
            .map(Candidate::into_lemma)
            .collect()
    }

    #[test]
    fn keeps_file_order() {
        let engine = LexiconEngine::parse("дому\tдім\tдома\n").unwrap();
        assert_eq!(lemmas(&engine, "дому"), ["дім", "дома"]);
    }

    #[test]
    fn repeated_forms_accumulate() {
        let engine = LexiconEngine::parse("стали\tстати\nстали\tсталь\n").unwrap();
        assert_eq!(lemmas(&engine, "стали"), ["стати", "сталь"]);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn duplicate_lemmas_are_kept() {
        let engine = LexiconEngine::parse("мами\tмама\tмама\n").unwrap();
        assert_eq!(lemmas(&engine, "мами"), ["мама", "мама"]);
    }

    #[test]
    fn lookup_ignores_case() {
        let engine = LexiconEngine::parse("Києві\tКиїв\n").unwrap();
        assert_eq!(lemmas(&engine, "києві"), ["Київ"]);
        assert_eq!(lemmas(&engine, "КИЄВІ"), ["Київ"]);
    }

    #[test]
    fn unknown_word_has_no_candidates() {
        let engine = LexiconEngine::parse("дому\tдім\n").unwrap();
        assert!(engine.analyze("###").unwrap().is_empty());
    }

    #[test]
    fn skips_comments_blank_lines_and_crlf() {
        let engine = LexiconEngine::parse("# header\r\n\r\nхати\tхата\r\n").unwrap();
        assert_eq!(lemmas(&engine, "хати"), ["хата"]);
    }

    #[test]
    fn line_without_lemma_is_an_error() {
        let err = LexiconEngine::parse("дому\tдім\nсамотнє\n").unwrap_err();
        assert_eq!(
            err,
            InitError::ConstructFailed("line 2: expected form<TAB>lemma".into())
        );
    }

    #[test]
    fn empty_lexicon_is_valid() {
        let engine = LexiconEngine::parse("").unwrap();
        assert!(engine.is_empty());
        assert!(engine.analyze("будь-що").unwrap().is_empty());
    }
}
