use fos_dom::DomEventType;
use serde::Deserialize;

/// Mutation observer options
///
/// Field names follow the script-side dictionary (`childList`,
/// `attributeOldValue`, ...); missing fields default to false / absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub character_data_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// Attribute changes were asked for in any form
    pub fn attr(&self) -> bool {
        self.attributes || self.attribute_old_value || self.attribute_filter.is_some()
    }

    /// Character data changes were asked for in any form
    pub fn cdata(&self) -> bool {
        self.character_data || self.character_data_old_value
    }

    /// The attribute allow-list, when one restricts anything
    pub fn active_attribute_filter(&self) -> Option<&[String]> {
        self.attribute_filter
            .as_deref()
            .filter(|names| !names.is_empty())
    }

    /// Primitive event kinds a registration with these options listens to
    pub fn subscriptions(&self) -> Vec<DomEventType> {
        let mut kinds = Vec::with_capacity(5);
        if self.child_list || self.subtree {
            kinds.push(DomEventType::DOMNodeInserted);
            kinds.push(DomEventType::DOMNodeRemoved);
        }
        if self.attr() {
            kinds.push(DomEventType::DOMAttrModified);
        }
        if self.cdata() {
            kinds.push(DomEventType::DOMCharacterDataModified);
        }
        if self.subtree {
            kinds.push(DomEventType::DOMSubtreeModified);
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_predicates() {
        let opts = MutationObserverInit {
            attribute_old_value: true,
            ..Default::default()
        };
        assert!(opts.attr());
        assert!(!opts.cdata());

        let opts = MutationObserverInit {
            attribute_filter: Some(vec![]),
            character_data_old_value: true,
            ..Default::default()
        };
        assert!(opts.attr());
        assert!(opts.cdata());
        assert_eq!(opts.active_attribute_filter(), None);
    }

    #[test]
    fn test_subscriptions() {
        assert!(MutationObserverInit::default().subscriptions().is_empty());

        let child_list = MutationObserverInit {
            child_list: true,
            ..Default::default()
        };
        assert_eq!(
            child_list.subscriptions(),
            vec![DomEventType::DOMNodeInserted, DomEventType::DOMNodeRemoved]
        );

        let everything = MutationObserverInit {
            subtree: true,
            attributes: true,
            character_data: true,
            ..Default::default()
        };
        assert_eq!(everything.subscriptions(), DomEventType::ALL.to_vec());
    }
}
