use regex::Regex;
use std::sync::LazyLock;

/// One book of the scripture reference table.
#[derive(Debug, Clone)]
pub struct ScriptureBook {
    /// Canonical book name, used in archive paths (`Genesis`, `1 John`).
    pub name: String,
    /// Regex alternation of recognised spellings (`Genesis|Gen\.?|Gn`).
    pub spellings: String,
    /// Archive folder the book's chapters live in.
    pub group: String,
    pattern: Regex,
}

impl ScriptureBook {
    /// Compile the citation pattern for a book:
    /// word boundary, spelling, space, chapter, optional `:verse`, optional
    /// `-end`, word boundary.
    pub fn new(name: &str, spellings: &str, group: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"\b(?:{spellings}) (\d{{1,3}})(?::(\d{{1,3}}))?(?:-(\d{{1,3}}))?\b"
        ))?;
        Ok(Self {
            name: name.to_string(),
            spellings: spellings.to_string(),
            group: group.to_string(),
            pattern,
        })
    }

    /// Compiled citation pattern. Group 1 is the chapter, group 2 the verse.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// Immutable, order-preserving list of books. Passes run in declared order.
#[derive(Debug, Clone)]
pub struct ScriptureTable {
    books: Vec<ScriptureBook>,
}

// (canonical name, spellings, archive group)
//
// Canonical order, except that the gospel of John is declared after the
// numbered epistles: `1 John 3:16` contains `John 3:16`, so the epistles must
// claim it first.
const STANDARD_BOOKS: &[(&str, &str, &str)] = &[
    ("Genesis", r"Genesis|Gen\.?|Gn", "pentateuch"),
    ("Exodus", r"Exodus|Exod\.?|Exo\.?|Ex\.?", "pentateuch"),
    ("Leviticus", r"Leviticus|Lev\.?|Lv", "pentateuch"),
    ("Numbers", r"Numbers|Num\.?|Nm", "pentateuch"),
    ("Deuteronomy", r"Deuteronomy|Deut\.?|Dt", "pentateuch"),
    ("Joshua", r"Joshua|Josh\.?", "history"),
    ("Judges", r"Judges|Judg\.?|Jdg", "history"),
    ("Ruth", r"Ruth", "history"),
    ("1 Samuel", r"1 Samuel|1 Sam\.?|1Sam|I Samuel", "history"),
    ("2 Samuel", r"2 Samuel|2 Sam\.?|2Sam|II Samuel", "history"),
    ("1 Kings", r"1 Kings|1 Kgs\.?|1Kgs|I Kings", "history"),
    ("2 Kings", r"2 Kings|2 Kgs\.?|2Kgs|II Kings", "history"),
    ("1 Chronicles", r"1 Chronicles|1 Chron\.?|1 Chr\.?|I Chronicles", "history"),
    ("2 Chronicles", r"2 Chronicles|2 Chron\.?|2 Chr\.?|II Chronicles", "history"),
    ("Ezra", r"Ezra", "history"),
    ("Nehemiah", r"Nehemiah|Neh\.?", "history"),
    ("Esther", r"Esther|Esth\.?|Est\.?", "history"),
    ("Job", r"Job", "wisdom"),
    ("Psalms", r"Psalms?|Pss?\.?|Psa\.?", "wisdom"),
    ("Proverbs", r"Proverbs|Prov\.?|Prv", "wisdom"),
    ("Ecclesiastes", r"Ecclesiastes|Eccles\.?|Eccl?\.?|Qoh", "wisdom"),
    ("Song of Solomon", r"Song of Solomon|Song of Songs|Song of Sol\.?|Song", "wisdom"),
    ("Isaiah", r"Isaiah|Isa\.?", "major-prophets"),
    ("Jeremiah", r"Jeremiah|Jer\.?", "major-prophets"),
    ("Lamentations", r"Lamentations|Lam\.?", "major-prophets"),
    ("Ezekiel", r"Ezekiel|Ezek\.?|Eze\.?", "major-prophets"),
    ("Daniel", r"Daniel|Dan\.?|Dn", "major-prophets"),
    ("Hosea", r"Hosea|Hos\.?", "minor-prophets"),
    ("Joel", r"Joel", "minor-prophets"),
    ("Amos", r"Amos", "minor-prophets"),
    ("Obadiah", r"Obadiah|Obad\.?", "minor-prophets"),
    ("Jonah", r"Jonah|Jon\.?", "minor-prophets"),
    ("Micah", r"Micah|Mic\.?", "minor-prophets"),
    ("Nahum", r"Nahum|Nah\.?", "minor-prophets"),
    ("Habakkuk", r"Habakkuk|Hab\.?", "minor-prophets"),
    ("Zephaniah", r"Zephaniah|Zeph\.?|Zep\.?", "minor-prophets"),
    ("Haggai", r"Haggai|Hag\.?", "minor-prophets"),
    ("Zechariah", r"Zechariah|Zech\.?|Zec\.?", "minor-prophets"),
    ("Malachi", r"Malachi|Mal\.?", "minor-prophets"),
    ("Matthew", r"Matthew|Matt\.?|Mt", "gospels"),
    ("Mark", r"Mark|Mk|Mrk", "gospels"),
    ("Luke", r"Luke|Lk", "gospels"),
    ("Acts", r"Acts", "acts"),
    ("Romans", r"Romans|Rom\.?|Rm", "pauline"),
    ("1 Corinthians", r"1 Corinthians|1 Cor\.?|1Cor|I Corinthians", "pauline"),
    ("2 Corinthians", r"2 Corinthians|2 Cor\.?|2Cor|II Corinthians", "pauline"),
    ("Galatians", r"Galatians|Gal\.?", "pauline"),
    ("Ephesians", r"Ephesians|Eph\.?", "pauline"),
    ("Philippians", r"Philippians|Phil\.?|Php", "pauline"),
    ("Colossians", r"Colossians|Col\.?", "pauline"),
    ("1 Thessalonians", r"1 Thessalonians|1 Thess\.?|1 Th\.?|I Thessalonians|I Thess\.?", "pauline"),
    ("2 Thessalonians", r"2 Thessalonians|2 Thess\.?|2 Th\.?|II Thessalonians|II Thess\.?", "pauline"),
    ("1 Timothy", r"1 Timothy|1 Tim\.?|1Tim|I Timothy", "pauline"),
    ("2 Timothy", r"2 Timothy|2 Tim\.?|2Tim|II Timothy", "pauline"),
    ("Titus", r"Titus|Tit\.?", "pauline"),
    ("Philemon", r"Philemon|Philem\.?|Phlm|Phm", "pauline"),
    ("Hebrews", r"Hebrews|Heb\.?", "general"),
    ("James", r"James|Jas\.?", "general"),
    ("1 Peter", r"1 Peter|1 Pet\.?|1 Pt|1Pet|I Peter", "general"),
    ("2 Peter", r"2 Peter|2 Pet\.?|2 Pt|2Pet|II Peter", "general"),
    ("1 John", r"1 John|1 Jn\.?|1John|I John", "general"),
    ("2 John", r"2 John|2 Jn\.?|2John|II John", "general"),
    ("3 John", r"3 John|3 Jn\.?|3John|III John", "general"),
    ("Jude", r"Jude", "general"),
    ("Revelation", r"Revelation|Rev\.?|Rv", "apocalyptic"),
    ("John", r"John|Jn\.?|Jhn", "gospels"),
];

static STANDARD: LazyLock<ScriptureTable> = LazyLock::new(|| {
    let books = STANDARD_BOOKS
        .iter()
        .map(|(name, spellings, group)| {
            ScriptureBook::new(name, spellings, group).expect("standard table patterns compile")
        })
        .collect();
    ScriptureTable { books }
});

impl ScriptureTable {
    pub fn new(books: Vec<ScriptureBook>) -> Self {
        Self { books }
    }

    /// The built-in 66-book table.
    pub fn standard() -> &'static ScriptureTable {
        &STANDARD
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScriptureBook> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Archive group for a canonical book name.
    pub fn group_for(&self, book: &str) -> Option<&str> {
        self.books
            .iter()
            .find(|b| b.name == book)
            .map(|b| b.group.as_str())
    }
}
