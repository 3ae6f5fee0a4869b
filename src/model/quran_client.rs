//! REST client for the alquran.cloud API with query caching

use futures::future::try_join;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::cache::TtlCache;
use super::quran::{RevelationType, Surah, SurahDetail, Verse};
use crate::error::{FetchError, PlaybackError};
use crate::playback::{PlaybackRequest, VerseAudioResolver};
use crate::{log_api_request, log_api_result};

pub const DEFAULT_API_URL: &str = "https://api.alquran.cloud/v1";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSurah {
    number: u32,
    name: String,
    english_name: String,
    english_name_translation: String,
    number_of_ayahs: u32,
    revelation_type: RevelationType,
}

impl From<ApiSurah> for Surah {
    fn from(s: ApiSurah) -> Self {
        Self {
            number: s.number,
            name: s.name,
            english_name: s.english_name,
            english_name_translation: s.english_name_translation,
            number_of_ayahs: s.number_of_ayahs,
            revelation_type: s.revelation_type,
        }
    }
}

#[derive(Deserialize)]
struct ApiSurahEdition {
    #[serde(flatten)]
    surah: ApiSurah,
    ayahs: Vec<ApiAyah>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAyah {
    number: u32,
    text: String,
    number_in_surah: u32,
    #[serde(default)]
    juz: u32,
    #[serde(default)]
    page: u32,
    /// `false`, or an object describing the prostration
    #[serde(default)]
    sajda: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAyahAudio {
    audio: Option<String>,
    #[serde(default)]
    audio_secondary: Vec<String>,
}

/// Unwrap the `{ code, status, data }` envelope every endpoint returns.
fn parse_envelope<T: DeserializeOwned>(body: Value) -> Result<T, FetchError> {
    let code = body.get("code").and_then(Value::as_u64).unwrap_or(0);
    if code != 200 {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        return Err(FetchError::Api {
            code: u16::try_from(code).unwrap_or(0),
            status,
        });
    }
    let data = body
        .get("data")
        .cloned()
        .ok_or_else(|| FetchError::Malformed("missing data".to_string()))?;
    serde_json::from_value(data).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Pair Arabic verses with translation verses by position.
fn merge_translation(arabic: ApiSurahEdition, translation: ApiSurahEdition, translation_id: &str) -> SurahDetail {
    let mut translated = translation.ayahs.into_iter().map(|a| a.text);
    let verses = arabic
        .ayahs
        .into_iter()
        .map(|ayah| Verse {
            number: ayah.number,
            number_in_surah: ayah.number_in_surah,
            text: ayah.text,
            translation: translated.next(),
            juz: ayah.juz,
            page: ayah.page,
            sajda: matches!(ayah.sajda, Value::Bool(true) | Value::Object(_)),
        })
        .collect();

    SurahDetail {
        surah: arabic.surah.into(),
        verses,
        translation_id: translation_id.to_string(),
    }
}

fn audio_url(audio: ApiAyahAudio) -> Result<String, FetchError> {
    audio
        .audio
        .filter(|url| !url.is_empty())
        .or_else(|| audio.audio_secondary.into_iter().next())
        .ok_or_else(|| FetchError::Malformed("no audio URL in response".to_string()))
}

/// Client for Surah text, translations and verse audio
#[derive(Clone)]
pub struct QuranClient {
    http: reqwest::Client,
    base_url: String,
    surahs: TtlCache<(), Vec<Surah>>,
    details: TtlCache<(u32, String), SurahDetail>,
}

impl QuranClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            surahs: TtlCache::default(),
            details: TtlCache::default(),
        }
    }

    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        log_api_request!("GET", url = %url);
        let result = async {
            let response = self.http.get(&url).send().await?;
            Ok::<Value, FetchError>(response.json::<Value>().await?)
        }
        .await;
        log_api_result!(path, result);
        result
    }

    pub async fn get_surahs(&self) -> Result<Vec<Surah>, FetchError> {
        if let Some(surahs) = self.surahs.get(&()).await {
            return Ok(surahs);
        }
        let body = self.get_json("surah").await?;
        let surahs: Vec<Surah> = parse_envelope::<Vec<ApiSurah>>(body)?
            .into_iter()
            .map(Surah::from)
            .collect();
        tracing::debug!(count = surahs.len(), "Surah list cached");
        self.surahs.insert((), surahs.clone()).await;
        Ok(surahs)
    }

    /// Fetch a Surah's Arabic text together with one translation edition.
    pub async fn get_surah(&self, number: u32, translation_id: &str) -> Result<SurahDetail, FetchError> {
        let key = (number, translation_id.to_string());
        if let Some(detail) = self.details.get(&key).await {
            return Ok(detail);
        }

        let (arabic, translation) = try_join(
            self.get_json(&format!("surah/{}", number)),
            self.get_json(&format!("surah/{}/{}", number, translation_id)),
        )
        .await?;
        let detail = merge_translation(parse_envelope(arabic)?, parse_envelope(translation)?, translation_id);

        tracing::debug!(surah = number, translation = translation_id, "Surah detail cached");
        self.details.insert(key, detail.clone()).await;
        Ok(detail)
    }

    pub async fn get_ayah_audio(&self, surah: u32, ayah: u32, reciter: &str) -> Result<String, FetchError> {
        let body = self
            .get_json(&format!("ayah/{}:{}/{}", surah, ayah, reciter))
            .await?;
        audio_url(parse_envelope(body)?)
    }
}

impl VerseAudioResolver for QuranClient {
    async fn resolve_audio(&self, request: &PlaybackRequest) -> Result<String, PlaybackError> {
        self.get_ayah_audio(request.surah, request.ayah, &request.reciter)
            .await
            .map_err(|e| PlaybackError::Resolution {
                surah: request.surah,
                ayah: request.ayah,
                reason: e.to_string(),
            })
    }
}
