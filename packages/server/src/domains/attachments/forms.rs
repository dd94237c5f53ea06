use std::fmt;
use std::str::FromStr;

use super::AttachmentError;

/// Dosage forms kept during ingestion. Anything else is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DosageForm {
    Tablets,
    CoatedTablets,
    ProlongedReleaseTablets,
    HardCapsules,
    Suppositories,
}

impl DosageForm {
    pub const ALL: [DosageForm; 5] = [
        DosageForm::Tablets,
        DosageForm::CoatedTablets,
        DosageForm::ProlongedReleaseTablets,
        DosageForm::HardCapsules,
        DosageForm::Suppositories,
    ];

    /// Label as written in the announcement spreadsheets.
    pub fn label(self) -> &'static str {
        match self {
            DosageForm::Tablets => "tabletki",
            DosageForm::CoatedTablets => "tabletki powlekane",
            DosageForm::ProlongedReleaseTablets => "tabletki o przedłużonym uwalnianiu",
            DosageForm::HardCapsules => "kapsułki twarde",
            DosageForm::Suppositories => "czopki",
        }
    }

    /// Label used for grouping; oral solid forms collapse to plain tablets.
    pub fn concise_label(self) -> &'static str {
        match self {
            DosageForm::Tablets
            | DosageForm::CoatedTablets
            | DosageForm::ProlongedReleaseTablets
            | DosageForm::HardCapsules => DosageForm::Tablets.label(),
            DosageForm::Suppositories => DosageForm::Suppositories.label(),
        }
    }
}

impl FromStr for DosageForm {
    type Err = AttachmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DosageForm::ALL
            .into_iter()
            .find(|form| form.label() == s)
            .ok_or_else(|| AttachmentError::UnsupportedForm(s.to_string()))
    }
}

impl fmt::Display for DosageForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Active-ingredient fields naming more than one substance use `+`.
pub fn is_multi_ingredient(active_ingredient: &str) -> bool {
    active_ingredient.contains('+')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_forms_round_trip_through_labels() {
        for form in DosageForm::ALL {
            assert_eq!(form.label().parse::<DosageForm>().unwrap(), form);
        }
    }

    #[test]
    fn syrup_is_not_accepted() {
        assert!(matches!(
            "syrop".parse::<DosageForm>(),
            Err(AttachmentError::UnsupportedForm(form)) if form == "syrop"
        ));
        assert!("tabletki musujące".parse::<DosageForm>().is_err());
    }

    #[test]
    fn verbose_forms_collapse_to_tablets() {
        let capsules: DosageForm = "kapsułki twarde".parse().unwrap();
        assert_eq!(capsules.concise_label(), "tabletki");
        assert_eq!(DosageForm::CoatedTablets.concise_label(), "tabletki");
        assert_eq!(DosageForm::ProlongedReleaseTablets.concise_label(), "tabletki");
    }

    #[test]
    fn suppositories_keep_their_label() {
        assert_eq!(DosageForm::Suppositories.concise_label(), "czopki");
    }

    #[test]
    fn plus_marks_combination_products() {
        assert!(is_multi_ingredient("Paracetamolum + Codeini phosphas"));
        assert!(!is_multi_ingredient("Paracetamolum"));
    }
}
