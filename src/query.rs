//! Fixed lookup tables and free-text intent matching.

use phf::phf_ordered_map;

/// Region -> generation number, in release order.
pub static REGIONS: phf::OrderedMap<&'static str, u32> = phf_ordered_map! {
    "kanto" => 1,
    "johto" => 2,
    "hoenn" => 3,
    "sinnoh" => 4,
    "unova" => 5,
    "kalos" => 6,
    "alola" => 7,
    "galar" => 8,
    "paldea" => 9,
};

pub const AFFINITIES: [&str; 18] = [
    "normal", "fire", "water", "electric", "grass", "ice", "fighting", "poison", "ground", "flying",
    "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];

pub fn region_generation(region: &str) -> Option<u32> {
    REGIONS.get(region.trim().to_ascii_lowercase().as_str()).copied()
}

pub fn region_names() -> Vec<&'static str> {
    REGIONS.keys().copied().collect()
}

pub fn is_known_affinity(affinity: &str) -> bool {
    let affinity = affinity.trim().to_ascii_lowercase();
    AFFINITIES.contains(&affinity.as_str())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    ByNumber(u32),
    Random,
    RandomFromRegion(String),
    RandomByAffinity(String),
}

/// Words that mark the number after them as a national dex id.
const NUMBER_CUES: [&str; 5] = ["pokemon", "number", "no", "dex", "pokedex"];
const GENERATION_CUES: [&str; 2] = ["generation", "gen"];

/// Matches a free-text request against the supported intents.
///
/// A dex number wins over a region, a region over an affinity, and an affinity
/// over a bare "random". A number only counts as a dex number when it carries
/// a `#`, follows a cue word like "pokemon" or "number", or is the whole query.
/// "generation 3" picks the matching region.
pub fn parse_intent(query: &str) -> Option<Intent> {
    let lowered = query.to_ascii_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
        .filter(|token| !token.is_empty())
        .collect();

    if let Some(number) = find_number(&tokens) {
        return Some(Intent::ByNumber(number));
    }
    if let Some(region) = tokens.iter().find(|token| REGIONS.contains_key(**token)) {
        return Some(Intent::RandomFromRegion(region.to_string()));
    }
    if let Some(region) = find_generation(&tokens) {
        return Some(Intent::RandomFromRegion(region.to_string()));
    }
    if let Some(affinity) = tokens.iter().find(|token| AFFINITIES.contains(*token)) {
        return Some(Intent::RandomByAffinity(affinity.to_string()));
    }
    if tokens
        .iter()
        .any(|token| matches!(*token, "random" | "any" | "surprise" | "anything"))
    {
        return Some(Intent::Random);
    }
    None
}

fn find_number(tokens: &[&str]) -> Option<u32> {
    tokens.iter().enumerate().find_map(|(idx, token)| {
        let digits = match token.strip_prefix('#') {
            Some(rest) => rest,
            None if tokens.len() == 1 => *token,
            None if idx > 0 && NUMBER_CUES.contains(&tokens[idx - 1]) => *token,
            None => return None,
        };
        positive_number(digits)
    })
}

fn find_generation(tokens: &[&str]) -> Option<&'static str> {
    tokens.windows(2).find_map(|pair| {
        if !GENERATION_CUES.contains(&pair[0]) {
            return None;
        }
        let generation = positive_number(pair[1])?;
        REGIONS
            .entries()
            .find(|(_, number)| **number == generation)
            .map(|(name, _)| *name)
    })
}

fn positive_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

pub fn help_text() -> String {
    [
        "I couldn't work out what you're looking for. Try one of these:",
        "  - \"pokemon #25\" or \"show me pokemon number 150\"",
        "  - \"give me a random pokemon\"",
        "  - \"random pokemon from johto\"",
        "  - \"random fire pokemon\"",
    ]
    .join("\n")
}
