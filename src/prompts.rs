//! Versioned prompt templates for both extraction pipelines.
//!
//! The templates carry business rules the model is asked to honor
//! (gender codes, 10-year validity, locality spelling, nationality format).
//! The rules that can be checked in code are re-checked in
//! [`crate::validation`].

/// Bumped whenever a template's wording or rules change.
pub const PROMPT_VERSION: &str = "2024-07.1";

/// Cameroonian localities used to correct OCR-mangled places of birth.
pub const KNOWN_LOCALITIES: &[&str] = &[
    "ABONG-MBANG",
    "AKONOLINGA",
    "AMBAM",
    "BAFANG",
    "BAFIA",
    "BAFOUSSAM",
    "BAHAM",
    "BAMENDA",
    "BANDJOUN",
    "BANGANGTE",
    "BANYO",
    "BATOURI",
    "BERTOUA",
    "BUEA",
    "DIBOMBARI",
    "DOUALA",
    "DSCHANG",
    "EBOLOWA",
    "EDEA",
    "ESEKA",
    "FOUMBAN",
    "FOUMBOT",
    "GAROUA",
    "GUIDER",
    "KAELE",
    "KOUSSERI",
    "KRIBI",
    "KUMBA",
    "KUMBO",
    "LIMBE",
    "LOUM",
    "MAMFE",
    "MANJO",
    "MAROUA",
    "MBALMAYO",
    "MBANGA",
    "MBOUDA",
    "MEIGANGA",
    "MOKOLO",
    "MORA",
    "NANGA-EBOKO",
    "NDOP",
    "NGAOUNDERE",
    "NKAMBE",
    "NKONGSAMBA",
    "OBALA",
    "SANGMELIMA",
    "TIBATI",
    "TIKO",
    "WUM",
    "YABASSI",
    "YAGOUA",
    "YAOUNDE",
];

const CNI_SCHEMA: &str = r#"{
  "lastNames": string,
  "firstNames": string,
  "dateOfBirth": string,
  "placeOfBirth": string,
  "gender": string,
  "height": string,
  "profession": string,
  "motherName": string,
  "fatherName": string,
  "address": string,
  "issueDate": string,
  "expiryDate": string,
  "idPost": string,
  "cniUniqueId": string,
  "cniNumber": string
}"#;

const PASSPORT_SCHEMA: &str = r#"{
  "lastNames": string,
  "firstNames": string,
  "nationality": string,
  "dateOfBirth": string,
  "gender": string,
  "placeOfBirth": string,
  "issueDate": string,
  "expiryDate": string,
  "profession": string,
  "height": string,
  "can": string,
  "placeOfIssue": string
}"#;

/// Prompt sent with the front and back images of a national ID card.
pub fn cni_prompt() -> String {
    format!(
        r#"You are given the JSON schema below and two images: the front and the back of a Cameroonian National Identity Card (CNI). Extract the card's data and return it as a single JSON object matching the schema.

Schema:
{schema}

Rules:
- 'cniNumber' must contain digits only.
- 'gender' must be exactly 'M' or 'F'.
- 'expiryDate' is always 10 years after 'issueDate'.
- Check 'placeOfBirth' against this list of valid Cameroonian localities: {localities}. If the name read from the card is not in the list, replace it with the closest valid name (for example "OBSCHANG" becomes "DSCHANG").
- Information may appear on either face of the card; combine both faces into one object.
- Use an empty string for any field that cannot be read.

Return only the JSON object."#,
        schema = CNI_SCHEMA,
        localities = KNOWN_LOCALITIES.join(", "),
    )
}

/// Prompt wrapping the OCR text of a passport data page.
pub fn passport_prompt(ocr_text: &str) -> String {
    format!(
        r#"You are given the JSON schema below and the text of a Cameroonian passport obtained with Tesseract OCR. Extract the passport's data from the text and return it as a single JSON object matching the schema.

Schema:
{schema}

Text:
"{text}"

Rules:
- 'nationality' must have no space after the '/' character: write 'CAMEROUNAISE/CAMEROONIAN', never 'CAMEROUNAISE/ CAMEROONIAN'.
- 'gender' must be exactly 'F' or 'M'. If the text is unclear, infer it from the person's names.
- Use an empty string for any field that cannot be read.

Return only the JSON object."#,
        schema = PASSPORT_SCHEMA,
        text = ocr_text,
    )
}
