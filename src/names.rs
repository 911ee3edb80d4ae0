//! Name Resolver
//!
//! Composite names are accumulated along the parent-link chain. Only
//! Navigator and Group links walk the chain; a Screen always derives its names
//! from its immediate parent link.
//!
//! Root navigators are skipped everywhere except in [`ParentLink::graph_name`],
//! which must stay unambiguous for every node.

use std::sync::Arc;

use crate::model::{Group, ImportRef, LinkTag, Navigator, ParentLink, Screen, ScreenKind};

fn concat<'a>(links: impl IntoIterator<Item = &'a ParentLink>) -> String {
    links.into_iter().map(|link| link.name.as_str()).collect()
}

fn names<'a>(links: impl IntoIterator<Item = &'a ParentLink>) -> Vec<String> {
    links.into_iter().map(|link| link.name.clone()).collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARENT LINKS
// ═══════════════════════════════════════════════════════════════════════════════

impl ParentLink {
    /// Links from the outermost ancestor down to `self`.
    pub fn chain(&self) -> Vec<&ParentLink> {
        let mut chain = vec![self];
        let mut current = self.parent.as_deref();
        while let Some(link) = current {
            chain.push(link);
            current = link.parent.as_deref();
        }
        chain.reverse();
        chain
    }

    fn is_named_navigator(&self) -> bool {
        self.tag == LinkTag::Navigator && !self.root
    }

    fn navigators(&self) -> Vec<&ParentLink> {
        self.chain()
            .into_iter()
            .filter(|link| link.is_named_navigator())
            .collect()
    }

    /// Non-root navigators and all groups.
    fn accumulated(&self) -> Vec<&ParentLink> {
        self.chain()
            .into_iter()
            .filter(|link| link.is_named_navigator() || link.tag == LinkTag::Group)
            .collect()
    }

    fn is_reference_group(&self) -> bool {
        self.tag == LinkTag::Group && self.reference
    }

    /// Groups never contribute their own name here.
    pub fn navigator_name(&self) -> String {
        concat(self.navigators())
    }

    pub fn import_specifier(&self) -> String {
        match self.tag {
            LinkTag::Navigator => self.navigator_name(),
            LinkTag::Group if self.reference => self.name.clone(),
            LinkTag::Group => concat(self.accumulated()),
        }
    }

    pub fn import_path(&self) -> Vec<String> {
        match self.tag {
            LinkTag::Navigator => names(self.navigators()),
            LinkTag::Group if self.reference => vec![self.name.clone()],
            LinkTag::Group => names(self.accumulated()),
        }
    }

    pub fn route_literal(&self) -> String {
        self.import_specifier()
    }

    /// Links that introduce a layer into route builders, outermost first.
    pub fn route_path(&self) -> Vec<&ParentLink> {
        match self.tag {
            LinkTag::Navigator => self.navigators(),
            LinkTag::Group if self.reference => vec![self],
            LinkTag::Group => self.accumulated(),
        }
    }

    /// Every ancestor name, root navigators included.
    pub fn graph_name(&self) -> String {
        concat(self.chain())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAVIGATORS & GROUPS
// ═══════════════════════════════════════════════════════════════════════════════

impl Navigator {
    /// Unlike the link name, a navigator always names its own stack, root or not.
    pub fn navigator_name(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}{}", parent.navigator_name(), self.name),
            None => self.name.clone(),
        }
    }

    pub fn stack_symbol(&self) -> String {
        format!("{}Stack", self.navigator_name())
    }

    pub fn component_symbol(&self) -> String {
        format!("{}Navigator", self.navigator_name())
    }

    /// Symbol an external navigator is imported under.
    pub fn external_symbol(&self) -> String {
        format!("{}Navigator", self.name)
    }

    /// `<name>Navigator` from the external path.
    pub fn external_import(&self) -> Option<ImportRef> {
        self.external_path()
            .map(|path| ImportRef::new(self.external_symbol(), path))
    }

    pub fn import_specifier(&self) -> String {
        self.link().import_specifier()
    }

    pub fn import_path(&self) -> Vec<String> {
        self.link().import_path()
    }

    pub fn route_literal(&self) -> String {
        self.link().route_literal()
    }

    pub fn graph_name(&self) -> String {
        self.link().graph_name()
    }

    /// Screen that stands for a nested navigator `child` inside this navigator.
    pub fn child_screen(&self, child: &Navigator) -> Screen {
        Screen {
            name: child.name.clone(),
            lazy: Some(false),
            kind: ScreenKind::Navigator,
            path: None,
            props: None,
            params: None,
            parent: Arc::new(ParentLink {
                reference: child.is_external(),
                ..self.link()
            }),
            config: self.config.clone(),
        }
    }
}

impl Group {
    /// Base of the enclosing navigator's stack symbol.
    pub fn navigator_name(&self) -> String {
        match &self.parent {
            Some(parent) => {
                let name = parent.navigator_name();
                if name.is_empty() && parent.tag == LinkTag::Navigator {
                    parent.name.clone()
                } else {
                    name
                }
            }
            None => self.name.clone(),
        }
    }

    pub fn stack_symbol(&self) -> String {
        format!("{}Stack", self.navigator_name())
    }

    pub fn import_specifier(&self) -> String {
        self.link().import_specifier()
    }

    pub fn import_path(&self) -> Vec<String> {
        self.link().import_path()
    }

    pub fn route_literal(&self) -> String {
        self.link().route_literal()
    }

    pub fn graph_name(&self) -> String {
        self.link().graph_name()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCREENS
// ═══════════════════════════════════════════════════════════════════════════════

impl Screen {
    pub fn stack_symbol(&self) -> String {
        let name = self.parent.navigator_name();
        if !name.is_empty() {
            return format!("{name}Stack");
        }

        let fallback = match self.parent.tag {
            LinkTag::Group => self
                .parent
                .parent
                .as_ref()
                .map(|navigator| navigator.name.as_str())
                .unwrap_or_default(),
            LinkTag::Navigator => self.parent.name.as_str(),
        };
        format!("{fallback}Stack")
    }

    fn own_specifier(&self) -> String {
        match self.kind {
            ScreenKind::Screen => self.name.clone(),
            ScreenKind::Navigator => format!("{}Navigator", self.name),
        }
    }

    pub fn import_specifier(&self) -> String {
        let own = self.own_specifier();
        if self.parent.tag == LinkTag::Navigator && self.parent.reference {
            return own;
        }
        format!("{}{}", self.parent.import_specifier(), own)
    }

    /// An explicit `path` replaces the derived one entirely.
    pub fn import_path(&self) -> String {
        if let Some(path) = &self.path {
            return path.clone();
        }

        std::iter::once(self.config.path.clone())
            .chain(self.parent.import_path())
            .chain(std::iter::once(self.name.clone()))
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Eagerly loaded screens are imported by name; lazy ones are required inline.
    pub fn eager_import(&self) -> Option<ImportRef> {
        (!self.is_lazy()).then(|| ImportRef::new(self.import_specifier(), self.import_path()))
    }

    pub fn route_literal(&self) -> String {
        format!("{}{}", self.parent.route_literal(), self.name)
    }

    /// Name of the exported route-literal constant.
    pub fn route_symbol(&self) -> String {
        format!("route{}", self.import_specifier())
    }

    /// Name of the exported route builder.
    pub fn builder_symbol(&self) -> String {
        format!("to{}", self.import_specifier())
    }

    pub fn graph_name(&self) -> String {
        format!("{}{}", self.parent.graph_name(), self.name)
    }

    /// Cumulative `screen` names of a route builder, outermost first. Inline
    /// groups add no navigation layer, so their segment is elided.
    pub fn route_segments(&self) -> Vec<String> {
        let route_path = self.parent.route_path();

        let mut names: Vec<String> = route_path.iter().map(|link| link.name.clone()).collect();
        names.push(self.name.clone());
        if self.parent.is_reference_group() {
            names = vec![names.concat()];
        }

        let mut literals: Vec<String> = Vec::new();
        for name in names.into_iter().filter(|name| !name.is_empty()) {
            let literal = match literals.last() {
                Some(previous) => format!("{previous}{name}"),
                None => name,
            };
            literals.push(literal);
        }

        literals
            .into_iter()
            .enumerate()
            .filter(|(index, _)| {
                route_path.get(*index).map_or(true, |link| {
                    !(link.tag == LinkTag::Group && !link.reference)
                })
            })
            .map(|(_, literal)| literal)
            .collect()
    }
}
