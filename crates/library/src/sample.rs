//! Example items a new library starts with

use crate::{Collection, Item, ItemDraft, ItemId, ItemKind, LibraryError, Result};
use annotation_model::{text, Annotation, AnnotationId, AnnotationSet, TextRange};
use chrono::{DateTime, NaiveDate, Utc};

const MORNING_GLORY: &str = "Golden rays break through the misty dawn
A new day whispers soft and clear
The world awakens with a gentle yawn
As morning glory draws us near

Birds sing melodies upon the breeze
Their chorus lifts the sleepy earth
While dewdrops dance on emerald trees
Celebrating nature's rebirth

This moment holds such simple grace
A reminder of life's sweet song
In morning's warm and bright embrace
We find where we truly belong";

const DIGITAL_DREAMS: &str = "Code flows like rivers through the night
Pixels dance in perfect harmony
Logic builds castles made of light
In this realm of digital artistry

Functions calling out across the void
Variables holding secrets deep
While algorithms, so carefully deployed
Promise dreams that data keeps

In binary we trust and find
The poetry of ones and zeros
Creating worlds within the mind
Where every coder becomes heroes";

const CITY_LIGHTS: &str = "Neon signs paint the midnight sky
Stories told in electric hue
A million dreams that never die
In the city that never knew

Footsteps echo on empty streets
While windows glow like distant stars
Each light a life, each shadow meets
The rhythm of passing cars

In this urban symphony
We find our place among the crowd
Dancing to the city's melody
Living free and singing loud";

/// Midnight UTC on the given day
fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

/// Annotate the first occurrence of `phrase` in `content`
pub fn anchor_phrase(
    id: AnnotationId,
    content: &str,
    phrase: &str,
    note: &str,
    created_at: DateTime<Utc>,
) -> Result<Annotation> {
    let byte_start = content
        .find(phrase)
        .filter(|_| !phrase.is_empty())
        .ok_or_else(|| LibraryError::PhraseNotFound(phrase.to_string()))?;
    let start = text::char_offset(content, byte_start);
    let range = TextRange::new(start, start + text::char_len(phrase));
    Ok(Annotation::with_id(id, range, phrase, note, created_at))
}

/// The three example items shown to a first-time user, newest first
pub fn sample_collection() -> Result<Collection> {
    let morning_date = day(2024, 1, 15);
    let morning_notes = AnnotationSet::new()
        .add(anchor_phrase(
            AnnotationId::from("ann1"),
            MORNING_GLORY,
            "Golden rays break through the misty dawn",
            "Beautiful imagery of sunrise breaking through morning mist",
            morning_date,
        )?)?
        .add(anchor_phrase(
            AnnotationId::from("ann2"),
            MORNING_GLORY,
            "Birds sing melodies upon the breeze",
            "Personification of nature - birds as musicians",
            morning_date,
        )?)?;
    let mut morning = ItemDraft::new("Morning Glory", MORNING_GLORY, ItemKind::Poem)
        .with_artist("Anonymous")
        .with_collection("Nature Verses")
        .with_year(2024)
        .with_tags(["nature", "morning", "peaceful", "original"]);
    morning.annotations = morning_notes;

    let digital_date = day(2024, 1, 20);
    let mut digital = ItemDraft::new("Digital Dreams", DIGITAL_DREAMS, ItemKind::Poem)
        .with_artist("TechPoet")
        .with_collection("Silicon Verses")
        .with_year(2023)
        .with_tags(["technology", "programming", "modern", "digital"]);
    digital.annotations = AnnotationSet::new().add(anchor_phrase(
        AnnotationId::from("ann3"),
        DIGITAL_DREAMS,
        "Pixels dance in perfect harmony",
        "Love this metaphor for how pixels create beautiful displays",
        digital_date,
    )?)?;

    let city = ItemDraft::new("City Lights", CITY_LIGHTS, ItemKind::Lyrics)
        .with_artist("Urban Echo")
        .with_album("Midnight Sessions")
        .with_year(2022)
        .with_tags(["urban", "nightlife", "city", "contemporary"]);

    Ok(Collection::from_items(vec![
        Item::with_id(ItemId::from("3"), city, day(2024, 1, 25))?,
        Item::with_id(ItemId::from("2"), digital, digital_date)?,
        Item::with_id(ItemId::from("1"), morning, morning_date)?,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_annotations_match_content() {
        let collection = sample_collection().unwrap();
        assert_eq!(collection.len(), 3);

        for item in &collection {
            assert!(item.annotations().validate_against(item.content()).is_ok());
            assert!(item.annotations().drifted(item.content()).is_empty());
        }
    }

    #[test]
    fn test_sample_offsets() {
        let collection = sample_collection().unwrap();
        let morning = collection.get(&ItemId::from("1")).unwrap();
        let first = morning.annotations().get(&AnnotationId::from("ann1")).unwrap();
        assert_eq!(first.range(), TextRange::new(0, 40));

        let digital = collection.get(&ItemId::from("2")).unwrap();
        let pixels = digital.annotations().get(&AnnotationId::from("ann3")).unwrap();
        assert_eq!(pixels.range(), TextRange::new(41, 72));
    }

    #[test]
    fn test_anchor_missing_phrase() {
        let err = anchor_phrase(AnnotationId::new(), "abc", "xyz", "n", day(2024, 1, 1));
        assert_eq!(err, Err(LibraryError::PhraseNotFound("xyz".into())));
    }
}
