use drug_lookup_service::DrugRecord;

/// Narration strings for the scan outcomes, in the narration's base
/// language.
///
/// Composition lives here so the resolution flow never formats user-facing
/// text itself. Only Vietnamese and English are carried; any other base
/// tag falls back to Vietnamese, the catalog's home language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCatalog {
    Vietnamese,
    English,
}

impl MessageCatalog {
    pub fn for_language(language_tag: &str) -> Self {
        match language_tag
            .split(['-', '_'])
            .next()
            .unwrap_or(language_tag)
            .to_lowercase()
            .as_str()
        {
            "en" => MessageCatalog::English,
            _ => MessageCatalog::Vietnamese,
        }
    }

    /// Full narration for a resolved over-the-counter record: name, then
    /// whichever of the ingredient / category / indications fields the
    /// catalog carries.
    pub fn resolved(&self, record: &DrugRecord) -> String {
        let mut message = match self {
            MessageCatalog::Vietnamese => format!("Đã tìm thấy thuốc {}.", record.name),
            MessageCatalog::English => format!("Found the medicine {}.", record.name),
        };
        if let Some(ingredient) = &record.active_ingredient {
            match self {
                MessageCatalog::Vietnamese => {
                    message.push_str(&format!(" Hoạt chất: {ingredient}."));
                }
                MessageCatalog::English => {
                    message.push_str(&format!(" Active ingredient: {ingredient}."));
                }
            }
        }
        if let Some(category) = &record.category {
            match self {
                MessageCatalog::Vietnamese => {
                    message.push_str(&format!(" Nhóm thuốc: {category}."));
                }
                MessageCatalog::English => {
                    message.push_str(&format!(" Category: {category}."));
                }
            }
        }
        if let Some(indications) = &record.indications {
            match self {
                MessageCatalog::Vietnamese => {
                    message.push_str(&format!(" Công dụng: {indications}"));
                }
                MessageCatalog::English => {
                    message.push_str(&format!(" Uses: {indications}"));
                }
            }
        }
        message
    }

    /// Reduced narration for a prescription-gated match: name and warning
    /// only, never clinical detail.
    pub fn prescription_blocked(&self, name: &str) -> String {
        match self {
            MessageCatalog::Vietnamese => format!(
                "{name}. Đây là thuốc kê đơn. Vui lòng sử dụng theo chỉ định của bác sĩ."
            ),
            MessageCatalog::English => format!(
                "{name}. This is a prescription drug. Please use as directed by your doctor."
            ),
        }
    }

    /// The cascade exhausted every stage. Echoes the recognized text for
    /// the user's reference; no record field is referenced.
    pub fn not_found(&self, recognized: &str) -> String {
        match self {
            MessageCatalog::Vietnamese => format!(
                "Không tìm thấy thông tin thuốc trong cơ sở dữ liệu. Văn bản đã nhận diện: {recognized}."
            ),
            MessageCatalog::English => format!(
                "No matching medicine was found in the database. Recognized text: {recognized}."
            ),
        }
    }

    /// Recognition produced nothing usable.
    pub fn no_candidates(&self) -> String {
        match self {
            MessageCatalog::Vietnamese => {
                "Không nhận diện được văn bản nào từ ảnh. Vui lòng thử lại.".to_string()
            }
            MessageCatalog::English => {
                "No text could be recognized from the image. Please try again.".to_string()
            }
        }
    }
}
