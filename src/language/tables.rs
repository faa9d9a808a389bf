//! Static language tables: ISO 639 mappings, aliases and display names.

/// ISO 639-1 two-letter codes mapped to ISO 639-2 three-letter codes
pub const TWO_TO_THREE: &[(&str, &str)] = &[
    ("ar", "ara"),
    ("zh", "zho"),
    ("cs", "ces"),
    ("da", "dan"),
    ("nl", "nld"),
    ("en", "eng"),
    ("fi", "fin"),
    ("fr", "fra"),
    ("de", "deu"),
    ("el", "ell"),
    ("he", "heb"),
    ("hi", "hin"),
    ("hu", "hun"),
    ("id", "ind"),
    ("it", "ita"),
    ("ja", "jpn"),
    ("ko", "kor"),
    ("no", "nor"),
    ("fa", "fas"),
    ("pl", "pol"),
    ("pt", "por"),
    ("ro", "ron"),
    ("ru", "rus"),
    ("sr", "srp"),
    ("sk", "slk"),
    ("es", "spa"),
    ("sv", "swe"),
    ("th", "tha"),
    ("tr", "tur"),
    ("uk", "ukr"),
    ("vi", "vie"),
];

/// Bibliographic ISO 639-2/B codes mapped to their terminological form
pub const BIBLIOGRAPHIC: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("per", "fas"),
];

/// Free-form names, regional tags and common misspellings per canonical code
pub const ALIASES: &[(&str, &[&str])] = &[
    (
        "eng",
        &["eng", "en", "english", "en-us", "en-gb", "en-ca", "en-au", "en_us", "en_gb"],
    ),
    (
        "jpn",
        &["jpn", "ja", "jp", "jap", "japanese", "日本語", "nihongo", "japones", "japon"],
    ),
    (
        "spa",
        &[
            "spa", "es", "spanish", "español", "espanol", "castellano", "es-es", "es-mx",
            "es-419",
        ],
    ),
    (
        "fra",
        &["fra", "fre", "fr", "french", "français", "francais", "fr-fr", "fr-ca", "fr-be"],
    ),
    (
        "deu",
        &["deu", "ger", "de", "german", "deutsch", "de-de", "de-at", "de-ch"],
    ),
    (
        "zho",
        &["zho", "chi", "zh", "chinese", "中文", "zhongwen", "mandarin", "zh-cn", "zh-tw"],
    ),
    ("ita", &["ita", "it", "italian", "italiano", "it-it"]),
    (
        "kor",
        &["kor", "ko", "korean", "한국어", "kr", "hangul", "hangugeo"],
    ),
    ("rus", &["rus", "ru", "russian", "русский", "russkiy"]),
    (
        "por",
        &[
            "por", "pt", "portuguese", "português", "portugues", "pt-br", "pt-pt", "brazilian",
        ],
    ),
    ("ara", &["ara", "ar", "arabic", "العربية", "al-arabiyyah"]),
    ("nld", &["nld", "dut", "nl", "dutch", "nederlands"]),
    ("hin", &["hin", "hi", "hindi", "हिन्दी"]),
    ("swe", &["swe", "sv", "swedish", "svenska"]),
    ("nor", &["nor", "no", "norwegian", "norsk"]),
    ("fin", &["fin", "fi", "finnish", "suomi"]),
    ("dan", &["dan", "da", "danish", "dansk"]),
    ("ces", &["ces", "cze", "cs", "czech", "čeština", "cestina"]),
    ("pol", &["pol", "pl", "polish", "polski"]),
    ("und", &["und", "undefined", "unknown", "unspecified"]),
];

/// Human readable names for canonical codes
pub const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("eng", "English"),
    ("spa", "Spanish"),
    ("fra", "French"),
    ("deu", "German"),
    ("ita", "Italian"),
    ("jpn", "Japanese"),
    ("zho", "Chinese"),
    ("kor", "Korean"),
    ("rus", "Russian"),
    ("ara", "Arabic"),
    ("por", "Portuguese"),
    ("nld", "Dutch"),
    ("hin", "Hindi"),
    ("swe", "Swedish"),
    ("nor", "Norwegian"),
    ("fin", "Finnish"),
    ("dan", "Danish"),
    ("ces", "Czech"),
    ("pol", "Polish"),
    ("ell", "Greek"),
    ("heb", "Hebrew"),
    ("hun", "Hungarian"),
    ("ind", "Indonesian"),
    ("fas", "Persian"),
    ("ron", "Romanian"),
    ("srp", "Serbian"),
    ("slk", "Slovak"),
    ("tha", "Thai"),
    ("tur", "Turkish"),
    ("ukr", "Ukrainian"),
    ("vie", "Vietnamese"),
    ("und", "Unknown"),
];

/// Words that identify a language inside a track title, case-insensitive
pub const TITLE_NAMES: &[(&str, &[&str])] = &[
    ("eng", &["english", "inglés", "anglais"]),
    ("spa", &["spanish", "español", "espagnol", "castellano"]),
    ("fra", &["french", "francés", "français"]),
    ("deu", &["german", "alemán", "deutsch", "allemand"]),
    ("ita", &["italian", "italiano", "italien"]),
    ("jpn", &["japanese", "japonés", "japonais", "日本語"]),
    ("zho", &["chinese", "chino", "chinois", "中文"]),
    ("kor", &["korean", "coreano", "coréen", "한국어"]),
    ("rus", &["russian", "ruso", "russe", "русский"]),
];

/// Languages offered first in pickers and help output
pub const COMMON: &[&str] = &[
    "eng", "spa", "fra", "deu", "ita", "jpn", "zho", "kor", "rus", "por", "ara", "nld", "hin",
    "swe",
];

/// Media and subtitle extensions recognised after a language segment in a file name
pub const LANGUAGE_SUFFIX_EXTENSIONS: &str =
    "srt|ass|ssa|sub|idx|vtt|mks|ac3|aac|mp3|mka|mkv|mp4";
