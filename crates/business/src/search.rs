//! Listing filters applied to the full io-service listing.

use common::types::HouseRecord;

/// The shorter of `keyword` and `name`, lower-cased, occurs in the longer one.
pub fn partial_match(keyword: &str, name: &str) -> bool {
    let keyword = keyword.to_lowercase();
    let name = name.to_lowercase();
    if keyword.len() <= name.len() {
        name.contains(&keyword)
    } else {
        keyword.contains(&name)
    }
}

pub fn by_owner(houses: Vec<HouseRecord>, owner: &str) -> Vec<HouseRecord> {
    houses.into_iter().filter(|h| h.username == owner).collect()
}

pub fn by_category(houses: Vec<HouseRecord>, category: &str) -> Vec<HouseRecord> {
    let wanted = category.to_lowercase();
    houses.into_iter().filter(|h| h.category.to_lowercase() == wanted).collect()
}

pub fn by_keyword(houses: Vec<HouseRecord>, keyword: &str) -> Vec<HouseRecord> {
    houses.into_iter().filter(|h| partial_match(keyword, &h.house)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn house(name: &str, category: &str, username: &str) -> HouseRecord {
        HouseRecord {
            id: 1,
            house: name.into(),
            price: 1.0,
            surface: 1,
            description: "d".into(),
            category: category.into(),
            username: username.into(),
        }
    }

    #[test]
    fn partial_match_is_symmetric_and_case_insensitive() {
        assert!(partial_match("cab", "Cozy Cabin"));
        assert!(partial_match("COZY CABIN by the lake", "cozy cabin"));
        assert!(partial_match("Cozy Cabin", "cozy cabin"));
        assert!(!partial_match("villa", "Cozy Cabin"));
    }

    #[test]
    fn filters() {
        let all = vec![
            house("Cozy Cabin", "Chalet", "alice"),
            house("Sea Villa", "villa", "bob"),
            house("Cabin North", "CHALET", "Alice"),
        ];
        assert_eq!(by_owner(all.clone(), "alice").len(), 1);
        assert_eq!(by_category(all.clone(), "chalet").len(), 2);
        let found = by_keyword(all, "cabin");
        assert_eq!(found.iter().map(|h| h.house.as_str()).collect::<Vec<_>>(), ["Cozy Cabin", "Cabin North"]);
    }
}
