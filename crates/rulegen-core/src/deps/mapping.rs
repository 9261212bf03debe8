//! Package name → library lookup

use crate::taxonomy::LibraryId;
use std::collections::HashMap;

/// Known packages and the library whose rules cover them (many packages may share one library)
const PACKAGE_LIBRARIES: &[(&str, &str)] = &[
    // npm: frontend
    ("react", "REACT_CODING_STANDARDS"),
    ("react-dom", "REACT_CODING_STANDARDS"),
    ("next", "NEXT_JS"),
    ("react-router", "REACT_ROUTER"),
    ("react-router-dom", "REACT_ROUTER"),
    ("redux", "REDUX"),
    ("react-redux", "REDUX"),
    ("@reduxjs/toolkit", "REDUX"),
    ("zustand", "ZUSTAND"),
    ("@tanstack/react-query", "REACT_QUERY"),
    ("@angular/core", "ANGULAR_CODING_STANDARDS"),
    ("@ngrx/store", "NGRX"),
    ("@ngrx/signals", "NGRX"),
    ("@angular/material", "ANGULAR_MATERIAL"),
    ("vue", "VUE_CODING_STANDARDS"),
    ("nuxt", "NUXT"),
    ("pinia", "PINIA"),
    ("svelte", "SVELTE_CODING_STANDARDS"),
    ("@sveltejs/kit", "SVELTE_KIT"),
    ("astro", "ASTRO_CODING_STANDARDS"),
    ("tailwindcss", "TAILWIND"),
    ("styled-components", "STYLED_COMPONENTS"),
    ("sass", "SCSS"),
    // npm: backend
    ("express", "EXPRESS"),
    ("@nestjs/core", "NEST_JS"),
    ("fastify", "FASTIFY"),
    ("prisma", "PRISMA"),
    ("@prisma/client", "PRISMA"),
    // npm: database
    ("pg", "POSTGRES"),
    ("postgres", "POSTGRES"),
    ("mysql2", "MYSQL"),
    ("sqlite3", "SQLITE"),
    ("better-sqlite3", "SQLITE"),
    ("mongodb", "MONGODB"),
    ("mongoose", "MONGODB"),
    ("redis", "REDIS"),
    ("ioredis", "REDIS"),
    ("@aws-sdk/client-dynamodb", "DYNAMODB"),
    // npm: testing and tooling
    ("jest", "JEST"),
    ("vitest", "VITEST"),
    ("@playwright/test", "PLAYWRIGHT"),
    ("playwright", "PLAYWRIGHT"),
    ("cypress", "CYPRESS"),
    ("eslint", "ESLINT"),
    ("prettier", "PRETTIER"),
    ("typedoc", "TYPEDOC"),
    ("aws-cdk-lib", "AWS"),
    // pip
    ("django", "DJANGO"),
    ("fastapi", "FASTAPI"),
    ("flask", "FLASK"),
    ("psycopg", "POSTGRES"),
    ("psycopg2", "POSTGRES"),
    ("psycopg2-binary", "POSTGRES"),
    ("asyncpg", "POSTGRES"),
    ("mysqlclient", "MYSQL"),
    ("pymongo", "MONGODB"),
    ("motor", "MONGODB"),
    ("pytest", "PYTEST"),
    ("ruff", "RUFF"),
    ("boto3", "AWS"),
];

/// Lookup table from package name to library
#[derive(Debug, Clone)]
pub struct DependencyMap {
    packages: HashMap<String, LibraryId>,
}

impl Default for DependencyMap {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DependencyMap {
    /// The built-in npm and pip mappings
    pub fn builtin() -> Self {
        Self::from_pairs(PACKAGE_LIBRARIES.iter().copied())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let packages = pairs
            .into_iter()
            .map(|(package, library)| (lookup_key(package), LibraryId::from(library)))
            .collect();
        Self { packages }
    }

    /// Library for a package name, case-insensitive.
    ///
    /// Scoped npm names match on `@scope/name`, so `@angular/core/testing` resolves like
    /// `@angular/core`.
    pub fn lookup(&self, package: &str) -> Option<&LibraryId> {
        let key = lookup_key(package);
        self.packages.get(&key)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

fn lookup_key(package: &str) -> String {
    let package = package.trim().to_ascii_lowercase();
    if package.starts_with('@') {
        package.split('/').take(2).collect::<Vec<_>>().join("/")
    } else {
        // pip treats `_`, `.` and `-` in project names as equivalent
        package
            .chars()
            .map(|c| if c == '_' || c == '.' { '-' } else { c })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_plain_names() {
        let map = DependencyMap::builtin();
        assert_eq!(map.lookup("react").map(LibraryId::as_str), Some("REACT_CODING_STANDARDS"));
        assert_eq!(map.lookup("Django").map(LibraryId::as_str), Some("DJANGO"));
        assert!(map.lookup("left-pad").is_none());
    }

    #[test]
    fn test_lookup_scoped_names_use_two_segments() {
        let map = DependencyMap::builtin();
        assert_eq!(
            map.lookup("@angular/core/testing").map(LibraryId::as_str),
            Some("ANGULAR_CODING_STANDARDS")
        );
        assert_eq!(map.lookup("@prisma/client").map(LibraryId::as_str), Some("PRISMA"));
        assert!(map.lookup("@angular").is_none());
    }

    #[test]
    fn test_lookup_normalizes_python_separators() {
        let map = DependencyMap::builtin();
        for name in ["psycopg2-binary", "psycopg2_binary", "Psycopg2.Binary"] {
            assert_eq!(map.lookup(name).map(LibraryId::as_str), Some("POSTGRES"), "{}", name);
        }
        assert_eq!(lookup_key("@types/node_utils"), "@types/node_utils");
    }

    #[test]
    fn test_every_mapped_library_exists_in_builtin_catalog() {
        let catalog = crate::catalog::Catalog::builtin().unwrap();
        let libraries = catalog.taxonomy.libraries();
        for (package, library) in PACKAGE_LIBRARIES {
            assert!(
                libraries.iter().any(|l| l.as_str() == *library),
                "{} maps to unknown library {}",
                package,
                library
            );
        }
    }
}
