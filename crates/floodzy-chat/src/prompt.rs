//! System instruction for the Floodzy assistant

use floodzy_tools::registry::args;
use floodzy_tools::ToolName;

/// Persona and tool-use guidance sent with every conversation
pub fn system_instruction() -> String {
    format!(
        "Anda adalah asisten informasi Floodzy. Gunakan fungsi yang tersedia untuk mendapatkan \
         data real-time tentang cuaca, banjir, tinggi muka air, dan status pompa. Selalu \
         prioritaskan penggunaan '{location}' saat mencari cuaca jika pengguna menyebutkan nama \
         lokasi, dan sistem akan mencari koordinatnya secara otomatis. Berikan jawaban yang \
         ringkas, informatif, dan relevan dengan pertanyaan pengguna. Contoh: Untuk 'cuaca di \
         Tangerang', panggil '{weather}' dengan '{location}: \"Tangerang\"'.",
        location = args::LOCATION_NAME,
        weather = ToolName::Weather,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_weather_tool() {
        let prompt = system_instruction();
        assert!(prompt.starts_with("Anda adalah asisten informasi Floodzy."));
        assert!(prompt.contains("panggil 'fetchWeatherData' dengan 'locationName: \"Tangerang\"'"));
    }
}
