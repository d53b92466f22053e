//! Seed data for `station_codes`.

/// A row of the station seed: code, name, state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedStation {
    pub code: &'static str,
    pub name: &'static str,
    pub state: &'static str,
}

const fn seed(code: &'static str, name: &'static str, state: &'static str) -> SeedStation {
    SeedStation { code, name, state }
}

const SEED: [SeedStation; 20] = [
    seed("NDLS", "New Delhi", "Delhi"),
    seed("BCT", "Mumbai Central", "Maharashtra"),
    seed("HWH", "Howrah Junction", "West Bengal"),
    seed("MAS", "Chennai Central", "Tamil Nadu"),
    seed("SBC", "Bengaluru City", "Karnataka"),
    seed("HYB", "Hyderabad", "Telangana"),
    seed("PUNE", "Pune Junction", "Maharashtra"),
    seed("JP", "Jaipur Junction", "Rajasthan"),
    seed("LKO", "Lucknow", "Uttar Pradesh"),
    seed("BPL", "Bhopal Junction", "Madhya Pradesh"),
    seed("KOAA", "Kolkata", "West Bengal"),
    seed("ADI", "Ahmedabad Junction", "Gujarat"),
    seed("BBS", "Bhubaneswar", "Odisha"),
    seed("TVC", "Thiruvananthapuram Central", "Kerala"),
    seed("GHY", "Guwahati", "Assam"),
    seed("PNBE", "Patna Junction", "Bihar"),
    seed("CDG", "Chandigarh", "Chandigarh"),
    seed("JU", "Jodhpur Junction", "Rajasthan"),
    seed("UDZ", "Udaipur City", "Rajasthan"),
    seed("BKN", "Bikaner Junction", "Rajasthan"),
];

/// Major stations loaded into a fresh database.
pub fn seed_stations() -> &'static [SeedStation] {
    &SEED
}
