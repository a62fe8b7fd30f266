// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `render`

#[cfg(test)]
mod tests {
    use crate::endpoint::Endpoint;
    use crate::render::{render_config, sort_records};

    fn a_record(name: &str, target: &str) -> Endpoint {
        Endpoint::new(name, "A", [target])
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render_config(&[]), "\n\n\n");
    }

    #[test]
    fn test_render_standard_records_sorted() {
        let records = vec![
            a_record("www.example.com", "192.0.2.2"),
            a_record("api.example.com", "192.0.2.1"),
        ];

        let expected = "hosts {\n\
                        \t192.0.2.1 api.example.com\n\
                        \t192.0.2.2 www.example.com\n\
                        \n\
                        \tttl 60\n\
                        \tno_reverse\n\
                        \tfallthrough\n\
                        }\n\n\n";
        assert_eq!(render_config(&records), expected);
    }

    #[test]
    fn test_render_standard_uses_first_target_only() {
        let records = vec![Endpoint::new(
            "multi.example.com",
            "A",
            ["192.0.2.1", "192.0.2.2"],
        )];

        let config = render_config(&records);
        assert!(config.contains("\t192.0.2.1 multi.example.com\n"));
        assert!(!config.contains("192.0.2.2"));
    }

    #[test]
    fn test_render_wildcard_template() {
        let records = vec![Endpoint::new(
            "*.apps.example.com",
            "A",
            ["192.0.2.10", "192.0.2.11", "192.0.2.12"],
        )
        .with_ttl(300)];

        let expected = "\n\n\
                        template IN A apps.example.com {\n\
                        \tanswer \"{{ .Name }} 300 IN A 192.0.2.10\"\n\
                        \tadditional \"{{ .Name }} 300 IN A 192.0.2.11\"\n\
                        \tadditional \"{{ .Name }} 300 IN A 192.0.2.12\"\n\
                        \n\
                        \tfallthrough\n\
                        }\n\n";
        assert_eq!(render_config(&records), expected);
    }

    #[test]
    fn test_render_wildcard_defaults_ttl() {
        let records = vec![a_record("*.example.com", "192.0.2.1")];
        let config = render_config(&records);
        assert!(config.contains("answer \"{{ .Name }} 60 IN A 192.0.2.1\""));
    }

    #[test]
    fn test_render_wildcard_keeps_explicit_zero_ttl() {
        let records = vec![a_record("*.example.com", "192.0.2.1").with_ttl(0)];
        let config = render_config(&records);
        assert!(config.contains("answer \"{{ .Name }} 0 IN A 192.0.2.1\""));
    }

    #[test]
    fn test_render_mixed_standard_and_wildcard() {
        let records = vec![
            a_record("*.b.example.com", "192.0.2.20"),
            a_record("host.example.com", "192.0.2.1"),
            a_record("*.a.example.com", "192.0.2.10"),
        ];

        let expected = "hosts {\n\
                        \t192.0.2.1 host.example.com\n\
                        \n\
                        \tttl 60\n\
                        \tno_reverse\n\
                        \tfallthrough\n\
                        }\n\n\
                        template IN A a.example.com {\n\
                        \tanswer \"{{ .Name }} 60 IN A 192.0.2.10\"\n\
                        \n\
                        \tfallthrough\n\
                        }\n\
                        template IN A b.example.com {\n\
                        \tanswer \"{{ .Name }} 60 IN A 192.0.2.20\"\n\
                        \n\
                        \tfallthrough\n\
                        }\n\n";
        assert_eq!(render_config(&records), expected);
    }

    #[test]
    fn test_wildcards_with_same_suffix_are_not_merged() {
        let records = vec![
            a_record("*.example.com", "192.0.2.1").with_set_identifier("a"),
            a_record("*.example.com", "192.0.2.2").with_set_identifier("b"),
        ];

        let config = render_config(&records);
        assert_eq!(config.matches("template IN A example.com {").count(), 2);
    }

    #[test]
    fn test_render_skips_unsupported_standard_type() {
        let records = vec![
            Endpoint::new("alias.example.com", "CNAME", ["www.example.com"]),
            a_record("www.example.com", "192.0.2.1"),
        ];

        let config = render_config(&records);
        assert!(!config.contains("alias.example.com"));
        assert!(config.contains("\t192.0.2.1 www.example.com\n"));
    }

    #[test]
    fn test_render_only_unsupported_records_omits_hosts_block() {
        let records = vec![Endpoint::new("txt.example.com", "TXT", ["hello"])];
        assert_eq!(render_config(&records), "\n\n\n");
    }

    #[test]
    fn test_render_ignores_standard_ttl() {
        let records = vec![a_record("www.example.com", "192.0.2.1").with_ttl(3600)];

        let config = render_config(&records);
        assert!(config.contains("\tttl 60\n"));
        assert!(!config.contains("3600"));
    }

    #[test]
    fn test_render_wildcard_is_not_type_filtered() {
        let records = vec![Endpoint::new(
            "*.example.com",
            "CNAME",
            ["target.example.net"],
        )];

        let config = render_config(&records);
        assert!(config.contains("template IN CNAME example.com {"));
        assert!(config.contains("answer \"{{ .Name }} 60 IN CNAME target.example.net\""));
    }

    #[test]
    fn test_render_skips_malformed_records() {
        let records = vec![
            a_record("", "192.0.2.1"),
            Endpoint::new("empty.example.com", "A", Vec::<String>::new()),
            a_record("*", "192.0.2.3"),
            a_record("*foo.example.com", "192.0.2.4"),
            Endpoint::new("*.none.example.com", "A", Vec::<String>::new()),
            a_record("ok.example.com", "192.0.2.5"),
        ];

        let config = render_config(&records);
        assert!(config.starts_with("hosts {\n\t192.0.2.5 ok.example.com\n\n"));
        assert!(!config.contains("template"));
        assert!(!config.contains("192.0.2.1"));
    }

    #[test]
    fn test_render_is_independent_of_input_order() {
        let mut records = vec![
            a_record("b.example.com", "192.0.2.2"),
            a_record("*.c.example.com", "192.0.2.3"),
            a_record("a.example.com", "192.0.2.1").with_set_identifier("z"),
            a_record("a.example.com", "192.0.2.9").with_set_identifier("y"),
        ];

        let first = render_config(&records);
        records.reverse();
        let second = render_config(&records);
        records.swap(0, 2);
        let third = render_config(&records);

        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn test_sort_records_orders_by_name_then_set_identifier() {
        let mut records = vec![
            a_record("b.example.com", "192.0.2.2"),
            a_record("a.example.com", "192.0.2.1").with_set_identifier("2"),
            a_record("a.example.com", "192.0.2.1").with_set_identifier("1"),
        ];

        sort_records(&mut records);

        let order: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.dns_name.as_str(), r.set_identifier.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.example.com", "1"),
                ("a.example.com", "2"),
                ("b.example.com", ""),
            ]
        );
    }
}
