// Built-in sample registrations, used when the sheet cannot be read.

const HEADER: [&str; 11] = [
    "Tidsmerke",
    "E-postadresse",
    "Fullt navn",
    "Telefonnummer",
    "Fødselsdato",
    "Kjønn",
    "Er du student?",
    "Spilte du på lag i fjor?",
    "Ønsket posisjon",
    "Ønsket nivå",
    "Startnummer",
];

const SAMPLE: &[[&str; 11]] = &[
    [
        "20.08.2025 18:02:11",
        "anna.berg@example.com",
        "Anna Berg",
        "91234567",
        "03.04.2001",
        "Kvinne / Female",
        "Ja",
        "NTNUI 2. div",
        "Kant, evt. dia",
        "1. divisjon",
        "1",
    ],
    [
        "20.08.2025 18:10:45",
        "bjorn.haugen@example.com",
        "Bjørn Haugen",
        "92345678",
        "17.11.1996",
        "Mann / Male",
        "Nei",
        "Nei",
        "Midt",
        "2. divisjon",
        "2",
    ],
    [
        "20.08.2025 19:31:02",
        "cecilie.lund@example.com",
        "Cecilie Lund",
        "93456789",
        "22.07.2006",
        "Kvinne / Female",
        "Ja",
        "Ingen",
        "Libero",
        "Første divisjon",
        "3",
    ],
    [
        "21.08.2025 08:15:37",
        "dag.solberg@example.com",
        "Dag Solberg",
        "94567890",
        "1999",
        "Mann / Male",
        "Yes",
        "Oslo Volley",
        "Setter",
        "3",
        "",
    ],
    [
        "21.08.2025 12:47:09",
        "eva.nilsen@example.com",
        "Eva Nilsen",
        "95678901",
        "09.02.2003",
        "Kvinne / Female",
        "Nei",
        "",
        "Opposite / kant",
        "4. div",
        "5",
    ],
    [
        "21.08.2025 21:03:58",
        "fredrik.dahl@example.com",
        "Fredrik Dahl",
        "96789012",
        "1994-05-30",
        "Mann / Male",
        "No",
        "Tromsø VBK",
        "Outside hitter",
        "Second",
        "6",
    ],
    [
        "22.08.2025 10:22:16",
        "guro.vik@example.com",
        "Guro Vik",
        "97890123",
        "30.09.2000",
        "Kvinne / Female",
        "Ja",
        "-",
        "Vet ikke",
        "Tredje",
        "7",
    ],
    [
        "22.08.2025 14:55:40",
        "henrik.moe@example.com",
        "Henrik Moe",
        "98901234",
        "12.12.2005",
        "Mann / Male",
        "Ja",
        "BSI Volleyball",
        "Midtblokk",
        "1",
        "8",
    ],
];

/// Header plus sample rows in the registration form layout.
pub fn sample_rows() -> Vec<Vec<String>> {
    std::iter::once(&HEADER)
        .chain(SAMPLE.iter())
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}
