use serde::{Deserialize, Serialize};

/// Supported UI languages. The preference round-trips through the settings
/// file as "en"/"ar".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn toggle(self) -> Self {
        match self {
            Locale::En => Locale::Ar,
            Locale::Ar => Locale::En,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    AppTitle,
    Tagline,
    Ready,
    TestingPing,
    TestingDownload,
    TestingUpload,
    TestComplete,
    Ping,
    Download,
    Upload,
    Speed,
    Ms,
    Mbps,
    ServerInfoTitle,
    IpLabel,
    IspLabel,
    OrgLabel,
    CityLabel,
    CountryLabel,
    Loading,
    AdviceTitle,
    FileSizeLabel,
    ErrorTitle,
    DownloadFailed,
    DownloadEmpty,
    GenericError,
    StartHint,
    StopHint,
    SizeHint,
    LanguageHint,
    QuitHint,
    AdvicePingPoor,
    AdvicePingFair,
    AdviceDownloadPoor,
    AdviceDownloadFair,
    AdviceUploadPoor,
    AdviceUploadFair,
    AdviceAllGood,
    AdviceGenerallyOkay,
}

/// Resolves a key to its localized text.
pub fn text(locale: Locale, key: TextKey) -> &'static str {
    use Locale::{Ar, En};
    match key {
        TextKey::AppTitle => match locale {
            En => "netgauge",
            Ar => "netgauge",
        },
        TextKey::Tagline => match locale {
            En => "Measure your internet connection speed.",
            Ar => "قم بقياس سرعة اتصالك بالإنترنت.",
        },
        TextKey::Ready => match locale {
            En => "Ready",
            Ar => "جاهز",
        },
        TextKey::TestingPing => match locale {
            En => "Testing ping...",
            Ar => "جاري اختبار البينج...",
        },
        TextKey::TestingDownload => match locale {
            En => "Testing download...",
            Ar => "جاري اختبار التنزيل...",
        },
        TextKey::TestingUpload => match locale {
            En => "Testing upload...",
            Ar => "جاري اختبار الرفع...",
        },
        TextKey::TestComplete => match locale {
            En => "Complete",
            Ar => "اكتمل",
        },
        TextKey::Ping => match locale {
            En => "Ping",
            Ar => "البينج",
        },
        TextKey::Download => match locale {
            En => "Download",
            Ar => "تنزيل",
        },
        TextKey::Upload => match locale {
            En => "Upload",
            Ar => "رفع",
        },
        TextKey::Speed => match locale {
            En => "Speed",
            Ar => "سرعة",
        },
        TextKey::Ms => match locale {
            En => "ms",
            Ar => "مللي ثانية",
        },
        TextKey::Mbps => match locale {
            En => "Mbps",
            Ar => "ميجابت/ثانية",
        },
        TextKey::ServerInfoTitle => match locale {
            En => "Connection",
            Ar => "الاتصال",
        },
        TextKey::IpLabel => match locale {
            En => "IP",
            Ar => "عنوان IP",
        },
        TextKey::IspLabel => match locale {
            En => "ISP",
            Ar => "مزود الخدمة",
        },
        TextKey::OrgLabel => match locale {
            En => "Organization",
            Ar => "المنظمة",
        },
        TextKey::CityLabel => match locale {
            En => "City",
            Ar => "المدينة",
        },
        TextKey::CountryLabel => match locale {
            En => "Country",
            Ar => "الدولة",
        },
        TextKey::Loading => match locale {
            En => "Loading...",
            Ar => "جاري التحميل...",
        },
        TextKey::AdviceTitle => match locale {
            En => "Advice",
            Ar => "نصائح",
        },
        TextKey::FileSizeLabel => match locale {
            En => "Test file size",
            Ar => "حجم ملف الاختبار",
        },
        TextKey::ErrorTitle => match locale {
            En => "Error",
            Ar => "خطأ",
        },
        TextKey::DownloadFailed => match locale {
            En => "Failed to download the '{file}' test payload. Status: {status}.",
            Ar => "فشل تنزيل ملف الاختبار '{file}'. الحالة: {status}.",
        },
        TextKey::DownloadEmpty => match locale {
            En => "The '{file}' test payload returned no content.",
            Ar => "لم يتم العثور على محتوى لملف الاختبار '{file}'.",
        },
        TextKey::GenericError => match locale {
            En => "An unexpected error occurred.",
            Ar => "حدث خطأ غير متوقع.",
        },
        TextKey::StartHint => match locale {
            En => "enter start",
            Ar => "enter ابدأ",
        },
        TextKey::StopHint => match locale {
            En => "esc stop",
            Ar => "esc إيقاف",
        },
        TextKey::SizeHint => match locale {
            En => "tab size",
            Ar => "tab الحجم",
        },
        TextKey::LanguageHint => match locale {
            En => "l language",
            Ar => "l اللغة",
        },
        TextKey::QuitHint => match locale {
            En => "q quit",
            Ar => "q خروج",
        },
        TextKey::AdvicePingPoor => match locale {
            En => "Your ping is high; real-time applications like video calls and gaming may suffer.",
            Ar => "زمن الاستجابة لديك مرتفع؛ قد تتأثر التطبيقات الفورية مثل مكالمات الفيديو والألعاب.",
        },
        TextKey::AdvicePingFair => match locale {
            En => "Your ping is moderate; most uses are fine but competitive gaming may lag.",
            Ar => "زمن الاستجابة لديك متوسط؛ معظم الاستخدامات جيدة لكن الألعاب التنافسية قد تتأخر.",
        },
        TextKey::AdviceDownloadPoor => match locale {
            En => "Your download speed is low; streaming video will buffer frequently.",
            Ar => "سرعة التنزيل لديك منخفضة؛ سيتقطع بث الفيديو بشكل متكرر.",
        },
        TextKey::AdviceDownloadFair => match locale {
            En => "Your download speed is fair; HD streaming works but 4K may struggle.",
            Ar => "سرعة التنزيل لديك مقبولة؛ البث عالي الدقة يعمل لكن دقة 4K قد تتعثر.",
        },
        TextKey::AdviceUploadPoor => match locale {
            En => "Your upload speed is low; sending large files or video calls will be slow.",
            Ar => "سرعة الرفع لديك منخفضة؛ سيكون إرسال الملفات الكبيرة أو مكالمات الفيديو بطيئًا.",
        },
        TextKey::AdviceUploadFair => match locale {
            En => "Your upload speed is fair; occasional large uploads will take time.",
            Ar => "سرعة الرفع لديك مقبولة؛ عمليات الرفع الكبيرة ستستغرق بعض الوقت.",
        },
        TextKey::AdviceAllGood => match locale {
            En => "Your connection looks great across the board. Enjoy!",
            Ar => "اتصالك يبدو ممتازًا في جميع الجوانب. استمتع!",
        },
        TextKey::AdviceGenerallyOkay => match locale {
            En => "Your connection is generally okay for everyday use.",
            Ar => "اتصالك جيد بشكل عام للاستخدام اليومي.",
        },
    }
}

/// Resolves a key and substitutes `{name}` placeholders.
pub fn text_with(locale: Locale, key: TextKey, params: &[(&str, String)]) -> String {
    let mut out = text(locale, key).to_owned();
    for (name, value) in params {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_locales() {
        assert_eq!(Locale::En.toggle(), Locale::Ar);
        assert_eq!(Locale::Ar.toggle(), Locale::En);
    }

    #[test]
    fn lookup_differs_per_locale() {
        assert_eq!(text(Locale::En, TextKey::Ping), "Ping");
        assert_eq!(text(Locale::Ar, TextKey::Ping), "البينج");
    }

    #[test]
    fn placeholders_are_substituted() {
        let message = text_with(
            Locale::En,
            TextKey::DownloadFailed,
            &[
                ("file", "100MB".to_owned()),
                ("status", "404".to_owned()),
            ],
        );
        assert_eq!(
            message,
            "Failed to download the '100MB' test payload. Status: 404."
        );
    }

    #[test]
    fn locale_serde_round_trip() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            locale: Locale,
        }
        let raw = toml::to_string(&Wrapper { locale: Locale::Ar }).unwrap();
        assert!(raw.contains("\"ar\""));
        let parsed: Wrapper = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.locale, Locale::Ar);
    }
}
