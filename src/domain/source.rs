use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// A news feed the reader knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Source {
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    pub language: &'static str,
    pub category: &'static str,
}

const fn source(
    name: &'static str,
    url: &'static str,
    description: &'static str,
    language: &'static str,
    category: &'static str,
) -> Source {
    Source {
        name,
        url,
        description,
        language,
        category,
    }
}

const NL_SOURCES: &[Source] = &[
    source("NOS", "https://feeds.nos.nl/nosnieuwsalgemeen", "Nederlandse Omroep Stichting - General News", "nl", "general"),
    source("NU.nl", "https://www.nu.nl/rss/Algemeen", "NU.nl - General News", "nl", "general"),
    source("De Telegraaf", "https://www.telegraaf.nl/rss", "De Telegraaf - News", "nl", "general"),
    source("RTL Nieuws", "https://www.rtlnieuws.nl/rss.xml", "RTL Nieuws - Latest News", "nl", "general"),
    source("AD.nl", "https://www.ad.nl/rss.xml", "Algemeen Dagblad - News", "nl", "general"),
    source("NOS Sport", "https://feeds.nos.nl/nossport", "NOS - Sports News", "nl", "sports"),
    source("NU.nl Tech", "https://www.nu.nl/rss/Tech", "NU.nl - Technology News", "nl", "technology"),
];

const US_SOURCES: &[Source] = &[
    source("CNN", "http://rss.cnn.com/rss/edition.rss", "CNN - Breaking News", "en", "general"),
    source("BBC News", "http://feeds.bbci.co.uk/news/rss.xml", "BBC News - Home", "en", "general"),
    source("Reuters", "https://feeds.reuters.com/reuters/topNews", "Reuters - Top News", "en", "general"),
    source("NPR", "https://feeds.npr.org/1001/rss.xml", "NPR - News", "en", "general"),
];

const UK_SOURCES: &[Source] = &[
    source("BBC UK", "http://feeds.bbci.co.uk/news/uk/rss.xml", "BBC News - UK", "en", "general"),
    source("The Guardian", "https://www.theguardian.com/uk/rss", "The Guardian - UK News", "en", "general"),
    source("Sky News", "http://feeds.skynews.com/feeds/rss/home.xml", "Sky News - Latest News", "en", "general"),
];

const DE_SOURCES: &[Source] = &[
    source("Tagesschau", "https://www.tagesschau.de/xml/rss2/", "Tagesschau - Nachrichten", "de", "general"),
    source("SPIEGEL ONLINE", "https://www.spiegel.de/schlagzeilen/index.rss", "SPIEGEL ONLINE - Schlagzeilen", "de", "general"),
    source("ZEIT ONLINE", "https://newsfeed.zeit.de/index", "ZEIT ONLINE - Nachrichten", "de", "general"),
];

const FR_SOURCES: &[Source] = &[
    source("Le Monde", "https://www.lemonde.fr/rss/une.xml", "Le Monde - À la une", "fr", "general"),
    source("France 24", "https://www.france24.com/fr/rss", "France 24 - Actualités", "fr", "general"),
    source("Liberation", "https://www.liberation.fr/arc/outboundfeeds/rss/", "Libération - Actualités", "fr", "general"),
];

/// Countries with a built-in source catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Country {
    #[default]
    Nl,
    Us,
    Uk,
    De,
    Fr,
}

impl Country {
    pub const ALL: [Country; 5] = [Country::Nl, Country::Us, Country::Uk, Country::De, Country::Fr];

    pub fn code(self) -> &'static str {
        match self {
            Country::Nl => "nl",
            Country::Us => "us",
            Country::Uk => "uk",
            Country::De => "de",
            Country::Fr => "fr",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Country::Nl => "Netherlands (Dutch)",
            Country::Us => "United States (English)",
            Country::Uk => "United Kingdom (English)",
            Country::De => "Germany (German)",
            Country::Fr => "France (French)",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Country::Nl => "🇳🇱",
            Country::Us => "🇺🇸",
            Country::Uk => "🇬🇧",
            Country::De => "🇩🇪",
            Country::Fr => "🇫🇷",
        }
    }

    pub fn sources(self) -> &'static [Source] {
        match self {
            Country::Nl => NL_SOURCES,
            Country::Us => US_SOURCES,
            Country::Uk => UK_SOURCES,
            Country::De => DE_SOURCES,
            Country::Fr => FR_SOURCES,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown country '{0}' (supported: nl, us, uk, de, fr)")]
pub struct UnknownCountry(pub String);

impl FromStr for Country {
    type Err = UnknownCountry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nl" | "netherlands" | "dutch" => Ok(Country::Nl),
            "us" | "usa" | "united-states" => Ok(Country::Us),
            "uk" | "gb" | "britain" => Ok(Country::Uk),
            "de" | "germany" | "german" => Ok(Country::De),
            "fr" | "france" | "french" => Ok(Country::Fr),
            _ => Err(UnknownCountry(s.to_string())),
        }
    }
}
