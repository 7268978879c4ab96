//! Built-in demo question/answer set.
//!
//! Order matters: when two entries score the same, the earlier one wins.

use crate::types::DemoQaEntry;

/// `(question, answer, language)` for every built-in demo entry.
pub const BUILTIN_QA: &[(&str, &str, &str)] = &[
    (
        "What is the weather forecast for Pune tomorrow?",
        "Tomorrow in Pune: Partly cloudy, max 31°C, min 24°C, with a 40% chance of light rain.",
        "en",
    ),
    (
        "How much fertilizer should I apply to my paddy crop?",
        "धान (paddy) के लिए प्रति एकड़ 50 किलो यूरिया, 25 किलो DAP और 15 किलो पोटाश डालें। \
         यूरिया को तीन बराबर हिस्सों में रोपाई, कल्ले निकलते समय और बाली निकलने से पहले दें।",
        "en",
    ),
    (
        "What is today's onion price in Nashik mandi?",
        "Onion at Lasalgaon APMC (Nashik) today: modal price ₹1,850 per quintal, \
         ranging from ₹1,400 to ₹2,100.",
        "en",
    ),
    (
        "Which government schemes can a small farmer apply for?",
        "Small farmers can apply for PM-KISAN (₹6,000 per year in three instalments), \
         PM Fasal Bima Yojana crop insurance, and the Soil Health Card scheme. \
         Registration is available at your nearest Common Service Centre.",
        "en",
    ),
    (
        "गेहूं की बुवाई का सही समय क्या है?",
        "गेहूं की बुवाई के लिए 1 से 20 नवंबर का समय सबसे अच्छा है। देर से बुवाई करने पर \
         प्रति एकड़ 10-12% अधिक बीज डालें।",
        "hi",
    ),
    (
        "How do I control pink bollworm in cotton?",
        "Install 5 pheromone traps per acre to monitor pink bollworm, remove and destroy \
         rosette flowers, and spray profenofos 50 EC at 2 ml per litre if more than \
         8 moths are caught per trap for three nights in a row.",
        "en",
    ),
    (
        "How often should I irrigate tomato plants in summer?",
        "In summer, irrigate tomato every 4-5 days with furrow irrigation, or daily for \
         30-40 minutes with drip. Avoid wetting the leaves to limit blight.",
        "en",
    ),
    (
        "मिट्टी की जांच कहाँ करवाएं?",
        "मिट्टी की जांच के लिए नजदीकी कृषि विज्ञान केंद्र या मृदा परीक्षण प्रयोगशाला में \
         नमूना दें। सॉइल हेल्थ कार्ड योजना के तहत जांच मुफ्त है।",
        "hi",
    ),
];

/// The built-in demo entries as owned values.
pub fn builtin_entries() -> Vec<DemoQaEntry> {
    BUILTIN_QA
        .iter()
        .map(|(question, answer, language)| DemoQaEntry::new(*question, *answer, *language))
        .collect()
}
