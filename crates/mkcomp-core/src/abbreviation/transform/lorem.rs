//! `lorem` placeholder text
//!
//! `lorem`, `lorem10`, `lorem5-15` and locale variants such as `loremru20`
//! turn the element into generated text. Randomness comes from the caller's
//! RNG so a fixed seed reproduces the same paragraph.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

use super::{Frame, resolve_implicit_tag};
use crate::abbreviation::config::ExpandConfig;
use crate::abbreviation::node::{Node, Value};

static LOREM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^lorem([a-z]*)(\d*)(-\d*)?$").unwrap());

const DEFAULT_WORD_COUNT: usize = 30;

/// Word bank for one language
#[derive(Debug)]
pub struct Vocabulary {
    /// Opening words of the very first paragraph
    pub common: &'static [&'static str],
    pub words: &'static [&'static str],
}

impl Vocabulary {
    /// Word bank for a locale suffix, latin for anything unknown.
    pub fn for_locale(locale: &str) -> &'static Vocabulary {
        match locale.to_lowercase().as_str() {
            "ru" => &RU,
            "sp" | "es" => &SP,
            _ => &LATIN,
        }
    }
}

pub(super) fn apply(
    node: &mut Node,
    ancestors: &[Frame],
    config: &ExpandConfig,
    rng: &mut impl Rng,
) {
    let Some(caps) = node.name().and_then(|name| LOREM_RE.captures(name)) else {
        return;
    };

    let vocabulary = Vocabulary::for_locale(caps.get(1).map_or("", |m| m.as_str()));
    let min = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .map_or(DEFAULT_WORD_COUNT, |n| n.max(1));
    let max = caps
        .get(3)
        .and_then(|m| m.as_str()[1..].parse::<usize>().ok())
        .map_or(min, |n| n.max(min));
    let word_count = rng.gen_range(min..=max);

    let repeat = node
        .repeat
        .or_else(|| ancestors.iter().rev().find_map(|frame| frame.repeat));
    let start_with_common = repeat.is_none_or(|r| r.value == 0);

    node.name = None;
    node.attributes = None;
    node.value = Some(vec![Value::Text(paragraph(
        vocabulary,
        word_count,
        start_with_common,
        rng,
    ))]);

    // Repeated lorem inside an element becomes one element per paragraph
    if node.repeat.is_some() && !ancestors.is_empty() {
        resolve_implicit_tag(node, ancestors, config);
    }
}

/// Generate `word_count` words of sentences.
pub fn paragraph(
    vocabulary: &Vocabulary,
    word_count: usize,
    start_with_common: bool,
    rng: &mut impl Rng,
) -> String {
    let mut sentences = Vec::new();
    let mut total = 0;

    if start_with_common && !vocabulary.common.is_empty() {
        let words: Vec<&str> = vocabulary.common.iter().copied().take(word_count).collect();
        total += words.len();
        sentences.push(sentence(insert_commas(words, rng), Some('.'), rng));
    }

    while total < word_count {
        let size = random_between(rng, 2, 30).min(word_count - total);
        let words = sample(vocabulary.words, size, rng);
        if words.is_empty() {
            break;
        }
        total += words.len();
        sentences.push(sentence(insert_commas(words, rng), None, rng));
    }

    sentences.join(" ")
}

/// Random number in `[from, to)`, `from` for an empty range.
fn random_between(rng: &mut impl Rng, from: usize, to: usize) -> usize {
    if to > from { rng.gen_range(from..to) } else { from }
}

/// `count` distinct words.
fn sample(words: &[&'static str], count: usize, rng: &mut impl Rng) -> Vec<&'static str> {
    let count = count.min(words.len());
    let mut picked: Vec<usize> = Vec::with_capacity(count);
    while picked.len() < count {
        let ix = random_between(rng, 0, words.len());
        if !picked.contains(&ix) {
            picked.push(ix);
        }
    }
    picked.into_iter().map(|ix| words[ix]).collect()
}

fn sentence(words: Vec<String>, end: Option<char>, rng: &mut impl Rng) -> String {
    let mut text = words
        .iter()
        .enumerate()
        .map(|(ix, word)| if ix == 0 { capitalize(word) } else { word.clone() })
        .collect::<Vec<_>>()
        .join(" ");

    const ENDINGS: [char; 4] = ['?', '!', '.', '.'];
    text.push(end.unwrap_or_else(|| ENDINGS[random_between(rng, 0, ENDINGS.len())]));
    text
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn insert_commas(words: Vec<&str>, rng: &mut impl Rng) -> Vec<String> {
    let mut words: Vec<String> = words.into_iter().map(str::to_string).collect();
    let len = words.len();
    if len < 2 {
        return words;
    }

    let total = match len {
        0..=3 => random_between(rng, 1, 4),
        4..=6 => random_between(rng, 0, 1),
        7..=12 => random_between(rng, 0, 2),
        _ => random_between(rng, 1, 4),
    };

    for _ in 0..total {
        let pos = random_between(rng, 0, len - 1);
        if !words[pos].ends_with(',') {
            words[pos].push(',');
        }
    }
    words
}

static LATIN: Vocabulary = Vocabulary {
    common: &[
        "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipisicing", "elit",
    ],
    words: &[
        "exercitationem", "perferendis", "perspiciatis", "laborum", "eveniet", "sunt", "iure",
        "nam", "nobis", "eum", "cum", "officiis", "excepturi", "odio", "consectetur", "quasi",
        "aut", "quisquam", "vel", "eligendi", "itaque", "non", "odit", "tempore", "quaerat",
        "dignissimos", "facilis", "neque", "nihil", "expedita", "vitae", "vero", "ipsum",
        "nisi", "animi", "cumque", "pariatur", "velit", "modi", "natus", "iusto", "eaque",
        "sequi", "illo", "sed", "ex", "et", "voluptatibus", "tempora", "veritatis", "ratione",
        "assumenda", "incidunt", "nostrum", "placeat", "aliquid", "fuga", "provident",
        "praesentium", "rem", "necessitatibus", "suscipit", "adipisci", "quidem", "possimus",
        "voluptas", "debitis", "sint", "accusantium", "unde", "sapiente", "voluptate", "qui",
        "aspernatur", "laudantium", "soluta", "amet", "quo", "aliquam", "saepe", "culpa",
        "libero", "ipsa", "dicta", "reiciendis", "nesciunt", "doloribus", "autem", "impedit",
        "minima", "maiores", "repudiandae", "ipsam", "obcaecati", "ullam", "enim", "totam",
        "delectus", "ducimus", "quis", "voluptates", "dolores", "molestiae", "harum",
        "dolorem", "quia", "voluptatem", "molestias", "magni", "distinctio", "omnis",
        "illum", "dolorum", "voluptatum", "ea", "quas", "quam", "corporis", "quae", "blanditiis",
        "atque", "deserunt", "laboriosam", "earum", "consequuntur", "hic", "cupiditate",
        "quibusdam", "accusamus", "ut", "rerum", "error", "minus", "eius", "ab", "ad", "nemo",
        "fugit", "officia", "at", "in", "id", "quos", "reprehenderit", "numquam", "iste",
        "fugiat", "sit", "inventore", "beatae", "repellendus", "magnam", "recusandae", "quod",
        "explicabo", "doloremque", "aperiam", "consequatur", "asperiores", "commodi",
        "optio", "dolor", "labore", "temporibus", "repellat", "veniam", "architecto", "est",
        "esse", "mollitia", "nulla", "a", "similique", "eos", "alias", "dolore", "tenetur",
        "deleniti", "porro", "facere", "maxime", "corrupti",
    ],
};

static RU: Vocabulary = Vocabulary {
    common: &[
        "далеко-далеко", "за", "словесными", "горами", "в стране", "гласных", "и согласных",
        "живут", "рыбные", "тексты",
    ],
    words: &[
        "вдали", "от", "всех", "они", "буквенных", "домах", "на", "берегу", "семантика",
        "большого", "языкового", "океана", "маленький", "ручеек", "даль", "журчит", "по",
        "всей", "обеспечивает", "ее", "всеми", "необходимыми", "правилами", "эта",
        "парадигматическая", "страна", "которой", "жаренные", "предложения", "залетают",
        "прямо", "рот", "даже", "всемогущая", "пунктуация", "не", "имеет", "власти", "над",
        "рыбными", "текстами", "ведущими", "безорфографичный", "образ", "жизни", "однажды",
        "одна", "маленькая", "строчка", "рыбного", "текста", "имени", "lorem", "ipsum",
        "решила", "выйти", "большой", "мир", "грамматики", "великий", "оксмокс",
        "предупреждал", "о", "злых", "запятых", "диких", "знаках", "вопроса", "коварных",
        "точках", "запятой", "но", "текст", "дал", "сбить", "себя", "толку", "он", "собрал",
        "семь", "своих", "заглавных", "букв", "подпоясал", "инициал", "за", "пояс", "пустился",
        "дорогу", "взобравшись", "первую", "вершину", "курсивных", "гор", "бросил",
        "последний", "взгляд", "назад", "силуэт", "своего", "родного", "города", "буквоград",
        "заголовок", "деревни", "алфавит", "подзаголовок", "своего", "переулка", "грустный",
        "реторический", "вопрос", "скатился", "его", "щеке", "продолжил", "свой", "путь",
        "дороге", "встретил", "рукопись",
    ],
};

static SP: Vocabulary = Vocabulary {
    common: &["mujer", "uno", "dolor", "más", "de", "poder", "mismo", "si"],
    words: &[
        "ejercicio", "preferencia", "perspicacia", "laboral", "paño", "suntuoso", "molde",
        "namibia", "planeador", "mirar", "demás", "oficinista", "excepción", "odio",
        "consecuencia", "casi", "auto", "chicharra", "velo", "elixir", "ataque", "no",
        "odio", "temporal", "cuórum", "dignísimo", "facilismo", "letra", "nihilista",
        "expedición", "alma", "alveolar", "aparte", "león", "animal", "como", "paria",
        "belleza", "modo", "natividad", "justo", "ataque", "séquito", "pillo", "sed", "ex",
        "y", "voluminoso", "temporalidad", "verdades", "racional", "asunción", "incidente",
        "marejada", "placenta", "amanecer", "fuga", "previsor", "presentación", "lejos",
        "necesariamente", "sospechoso", "adiposidad", "quindío", "pócima", "voluble",
        "débito", "sintió", "accesorio", "falda", "sapiencia", "volutas", "queso", "permacultura",
        "laudo", "soluciones", "entero", "pan", "litro", "tonelada", "culpa", "libertario",
        "mosca", "dictado", "reincidente", "nascimiento", "dolor", "escolar", "impedimento",
        "mínima", "mayores", "repugnante", "dulce", "obcecado", "montaña", "enigma", "total",
        "deletéreo", "décima", "cábala", "fotografía", "dolores", "molesto", "olvido",
        "paciencia", "resiliencia", "voluntad", "molestias", "magnífico", "distinción",
        "ocultos", "humo", "hábil", "quemado", "corpóreo", "blanco", "atrás", "desierto",
        "laborioso", "tierra", "consejo", "cupido", "quimera", "acuario", "utilidad",
        "réplica", "error", "menos", "ejemplo", "nadar", "fuego", "oficio", "atún",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }

    #[test]
    fn test_paragraph_has_requested_word_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for count in [1, 5, 8, 30, 120] {
            let text = paragraph(&LATIN, count, true, &mut rng);
            assert_eq!(word_count(&text), count, "{text}");
        }
    }

    #[test]
    fn test_common_opening() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let text = paragraph(&LATIN, 20, true, &mut rng);
        assert!(text.starts_with("Lorem ipsum"));

        let text = paragraph(&LATIN, 20, false, &mut rng);
        assert!(!text.starts_with("Lorem ipsum dolor sit amet"));
    }

    #[test]
    fn test_same_seed_same_text() {
        let a = paragraph(&LATIN, 40, false, &mut ChaCha8Rng::seed_from_u64(42));
        let b = paragraph(&LATIN, 40, false, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_sentences_are_capitalized_and_terminated() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let text = paragraph(&LATIN, 50, false, &mut rng);
        assert!(text.chars().next().is_some_and(char::is_uppercase));
        assert!(text.ends_with(|c| matches!(c, '.' | '!' | '?')));
    }

    #[test]
    fn test_apply_reads_word_range() {
        let config = ExpandConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..20 {
            let mut node = Node::named("lorem4-6");
            apply(&mut node, &[], &config, &mut rng);
            assert!(node.name.is_none());
            let count = word_count(&node.value_text());
            assert!((4..=6).contains(&count), "{count}");
        }
    }

    #[test]
    fn test_locale_selection() {
        assert!(std::ptr::eq(Vocabulary::for_locale("RU"), &RU));
        assert!(std::ptr::eq(Vocabulary::for_locale("xx"), &LATIN));
    }
}
