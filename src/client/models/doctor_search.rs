use crate::common::models::Doctor;

/// Specialization filter sentinel meaning "no filter".
pub const ALL_SPECIALIZATIONS: &str = "ALL";

/// Client-side doctor search over an already fetched list.
///
/// Filtering is a case-insensitive substring match on the name plus an exact
/// specialization match. Pages are 1-indexed; any filter change resets to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorSearch {
    query: String,
    specialization: String,
    page: usize,
    page_size: usize,
}

impl Default for DoctorSearch {
    fn default() -> Self {
        Self::new(6)
    }
}

impl DoctorSearch {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            specialization: ALL_SPECIALIZATIONS.to_string(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn specialization(&self) -> &str {
        &self.specialization
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn set_specialization(&mut self, specialization: impl Into<String>) {
        let specialization = specialization.into();
        self.specialization = if specialization.trim().is_empty() {
            ALL_SPECIALIZATIONS.to_string()
        } else {
            specialization
        };
        self.page = 1;
    }

    /// Moves to `page`, clamped to the pages `doctors` currently yields.
    pub fn set_page(&mut self, page: usize, doctors: &[Doctor]) {
        let last = self.page_count(doctors).max(1);
        self.page = page.clamp(1, last);
    }

    pub fn matches(&self, doctor: &Doctor) -> bool {
        let needle = self.query.trim().to_lowercase();
        let name_ok = needle.is_empty() || doctor.name.to_lowercase().contains(&needle);
        let spec_ok = self.specialization == ALL_SPECIALIZATIONS
            || doctor.specialization == self.specialization;
        name_ok && spec_ok
    }

    pub fn filter<'a>(&self, doctors: &'a [Doctor]) -> Vec<&'a Doctor> {
        doctors.iter().filter(|d| self.matches(d)).collect()
    }

    pub fn page_count(&self, doctors: &[Doctor]) -> usize {
        self.filter(doctors).len().div_ceil(self.page_size)
    }

    /// The doctors on the current page, in list order.
    pub fn current_page<'a>(&self, doctors: &'a [Doctor]) -> Vec<&'a Doctor> {
        self.filter(doctors)
            .into_iter()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .collect()
    }
}

/// "ALL" followed by the known specializations, deduplicated and sorted.
pub fn specialization_options(specializations: &[String]) -> Vec<String> {
    let mut options: Vec<String> = specializations
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    options.sort();
    options.dedup();
    options.insert(0, ALL_SPECIALIZATIONS.to_string());
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(id: &str, name: &str, specialization: &str) -> Doctor {
        Doctor {
            id: id.into(),
            name: name.into(),
            specialization: specialization.into(),
            photo_url: None,
        }
    }

    fn roster() -> Vec<Doctor> {
        vec![
            doctor("1", "Anna", "Cardiology"),
            doctor("2", "Bob", "Dermatology"),
            doctor("3", "Anand", "Dermatology"),
        ]
    }

    fn names(list: Vec<&Doctor>) -> Vec<String> {
        list.into_iter().map(|d| d.name.clone()).collect()
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let doctors = roster();
        let mut search = DoctorSearch::new(6);
        search.set_query("an");
        assert_eq!(names(search.filter(&doctors)), vec!["Anna", "Anand"]);
        search.set_query("AN");
        assert_eq!(names(search.filter(&doctors)), vec!["Anna", "Anand"]);
    }

    #[test]
    fn specialization_is_exact_or_all() {
        let doctors = roster();
        let mut search = DoctorSearch::new(6);
        search.set_specialization("Dermatology");
        assert_eq!(names(search.filter(&doctors)), vec!["Bob", "Anand"]);
        search.set_specialization("dermatology");
        assert!(search.filter(&doctors).is_empty());
        search.set_specialization(ALL_SPECIALIZATIONS);
        assert_eq!(search.filter(&doctors).len(), 3);
    }

    #[test]
    fn filter_changes_reset_to_first_page() {
        let doctors: Vec<Doctor> = (0..7).map(|i| doctor(&i.to_string(), "Dana", "GP")).collect();
        let mut search = DoctorSearch::new(2);
        search.set_page(3, &doctors);
        assert_eq!(search.page(), 3);
        search.set_query("da");
        assert_eq!(search.page(), 1);

        search.set_page(4, &doctors);
        search.set_specialization("GP");
        assert_eq!(search.page(), 1);
    }

    #[test]
    fn pages_are_ceil_of_filtered_count() {
        let doctors: Vec<Doctor> = (0..7).map(|i| doctor(&i.to_string(), "Dana", "GP")).collect();
        let mut search = DoctorSearch::new(3);
        assert_eq!(search.page_count(&doctors), 3);
        search.set_page(3, &doctors);
        assert_eq!(search.current_page(&doctors).len(), 1);
        search.set_page(9, &doctors);
        assert_eq!(search.page(), 3);
    }

    #[test]
    fn empty_result_has_no_pages_and_stays_on_first() {
        let doctors = roster();
        let mut search = DoctorSearch::new(6);
        search.set_query("zzz");
        assert_eq!(search.page_count(&doctors), 0);
        search.set_page(2, &doctors);
        assert_eq!(search.page(), 1);
        assert!(search.current_page(&doctors).is_empty());
    }

    #[test]
    fn options_start_with_all() {
        let options = specialization_options(&[
            "Neurology".to_string(),
            "Cardiology".to_string(),
            "Neurology".to_string(),
        ]);
        assert_eq!(options, vec!["ALL", "Cardiology", "Neurology"]);
    }
}
