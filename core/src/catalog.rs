//! Helpers for question lists: search, tag display and technology badges.

use bugbee_shared::Question;

pub const VISIBLE_TAGS: usize = 5;

pub const DEFAULT_BADGE_LOGO: &str =
    "https://res.cloudinary.com/vanshstorage/image/upload/v1729884943/download_m2eu84.png";

/// Case-insensitive match on title or author name. A blank query keeps all.
pub fn filter_questions<'a>(list: &'a [Question], query: &str) -> Vec<&'a Question> {
    let needle = query.trim().to_lowercase();
    list.iter()
        .filter(|q| {
            needle.is_empty()
                || q.title.to_lowercase().contains(&needle)
                || q.author_name().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Title-only search used on the user's own questions.
pub fn filter_by_title<'a>(list: &'a [Question], query: &str) -> Vec<&'a Question> {
    let needle = query.trim().to_lowercase();
    list.iter()
        .filter(|q| q.title.to_lowercase().contains(&needle))
        .collect()
}

pub fn visible_tags(tags: &[String], expanded: bool) -> &[String] {
    if expanded {
        tags
    } else {
        &tags[..tags.len().min(VISIBLE_TAGS)]
    }
}

pub fn hidden_tag_count(tags: &[String]) -> usize {
    tags.len().saturating_sub(VISIBLE_TAGS)
}

/// Split a comma-separated tag field. Blanks are dropped and duplicates
/// removed case-insensitively, first spelling wins.
pub fn tags_from_input(text: &str) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    let mut tags = Vec::new();
    for tag in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let key = tag.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            tags.push(tag.to_string());
        }
    }
    tags
}

struct Badge {
    name: &'static str,
    aliases: &'static [&'static str],
    logo: &'static str,
}

impl Badge {
    fn matches(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(tag))
    }
}

pub fn badge_logo(tag: &str) -> &'static str {
    let tag = tag.trim();
    BADGES
        .iter()
        .find(|badge| badge.matches(tag))
        .map_or(DEFAULT_BADGE_LOGO, |badge| badge.logo)
}

static BADGES: &[Badge] = &[
    Badge {
        name: "css",
        aliases: &["css3", "styling"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740912214/w3_css-icon_old_cllr3z.svg",
    },
    Badge {
        name: "image",
        aliases: &["Base64", "image testing"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740911931/picture-photo-svgrepo-com_lmkvwi.svg",
    },
    Badge {
        name: "react.js",
        aliases: &["reactjs", "react"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728738191/react-2_c6jrrj.svg",
    },
    Badge {
        name: "node.js",
        aliases: &["nodejs", "node"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728738192/nodejs-icon_z8mjxz.svg",
    },
    Badge {
        name: "javascript",
        aliases: &["js"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728738190/logo-javascript_jxymx6.svg",
    },
    Badge {
        name: "python",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728738250/python-icon_ihlzuk.svg",
    },
    Badge {
        name: "java",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728738362/java-icon_adjtgl.svg",
    },
    Badge {
        name: "c++",
        aliases: &["cpp"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728738190/c_ojh7bw.svg",
    },
    Badge {
        name: "html",
        aliases: &["html5"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728738191/html-1_xz62kl.svg",
    },
    Badge {
        name: "angular",
        aliases: &["angularjs"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728738190/angular-icon-1_aiwgpq.svg",
    },
    Badge {
        name: "digitalocean",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728738191/digitalocean-icon_u3tnrl.svg",
    },
    Badge {
        name: "aws",
        aliases: &["amazon web services"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728738913/icons8-aws_llolqc.svg",
    },
    Badge {
        name: "next.js",
        aliases: &["nextjs"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1728739011/nextjs-icon_cbafxp.svg",
    },
    Badge {
        name: "typescript",
        aliases: &["ts"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250169/typescript-icon-svgrepo-com_bfafaw.svg",
    },
    Badge {
        name: "go",
        aliases: &["golang"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250169/go-svgrepo-com_r3sgdm.svg",
    },
    Badge {
        name: "ruby",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250168/ruby-svgrepo-com_kmqkbz.svg",
    },
    Badge {
        name: "swift",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250168/swift-svgrepo-com_sivm0e.svg",
    },
    Badge {
        name: "kotlin",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250168/kotlin-svgrepo-com_xo0s9k.svg",
    },
    Badge {
        name: "rust",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250168/rust-svgrepo-com_h3tubm.svg",
    },
    Badge {
        name: "php",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250167/php-svgrepo-com_s3om4c.svg",
    },
    Badge {
        name: "c#",
        aliases: &["csharp"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250165/c--4_tkfunq.svg",
    },
    Badge {
        name: "r",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250164/r-lang-svgrepo-com_fif9ng.svg",
    },
    Badge {
        name: "vue.js",
        aliases: &["vuejs", "vue"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250162/vue-js-svgrepo-com_mqhp8l.svg",
    },
    Badge {
        name: "svelte",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250162/svelte-icon-svgrepo-com_kxmjly.svg",
    },
    Badge {
        name: "bootstrap",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250167/bootstrap-svgrepo-com_t8zqrl.svg",
    },
    Badge {
        name: "tailwind css",
        aliases: &["tailwindcss", "tailwind"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250166/tailwind-svgrepo-com_rslfdz.svg",
    },
    Badge {
        name: "express.js",
        aliases: &["expressjs", "express"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250166/express-svgrepo-com_juzt7u.svg",
    },
    Badge {
        name: "django",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250166/django-svgrepo-com_uwpint.svg",
    },
    Badge {
        name: "laravel",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250166/laravel-svgrepo-com_ael0jl.svg",
    },
    Badge {
        name: "mysql",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250165/mysql-logo-svgrepo-com_x0nodu.svg",
    },
    Badge {
        name: "postgresql",
        aliases: &["postgres"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250164/postgresql-svgrepo-com_g2tlss.svg",
    },
    Badge {
        name: "mongodb",
        aliases: &["mongo"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250164/mongodb-svgrepo-com_rnft5p.svg",
    },
    Badge {
        name: "docker",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250163/docker-svgrepo-com_ccoqmc.svg",
    },
    Badge {
        name: "kubernetes",
        aliases: &["k8s"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250163/kubernetes-svgrepo-com_munrul.svg",
    },
    Badge {
        name: "pandas",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250163/pandas-svgrepo-com_rd0owi.svg",
    },
    Badge {
        name: "flutter",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250163/flutter-svgrepo-com_r2emx4.svg",
    },
    Badge {
        name: "react native",
        aliases: &["reactnative"],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250161/preact-svgrepo-com_kycciw.svg",
    },
    Badge {
        name: "git",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250161/git-svgrepo-com_mqap7j.svg",
    },
    Badge {
        name: "nginx",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250161/nginx-logo-svgrepo-com_dv5ev4.svg",
    },
    Badge {
        name: "figma",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250161/figma-svgrepo-com_wqdiou.svg",
    },
    Badge {
        name: "linux",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250161/linux-svgrepo-com_xevtrj.svg",
    },
    Badge {
        name: "Gitlab",
        aliases: &[],
        logo: "https://res.cloudinary.com/vanshstorage/image/upload/v1740250161/gitlab-svgrepo-com_ok9wjq.svg",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::question;

    #[test]
    fn search_matches_title_or_author() {
        let mut list = vec![question(1, 0, 0), question(2, 0, 0)];
        list[0].title = "Borrow checker woes".into();
        list[1].user.as_mut().unwrap().name = "Ferris".into();

        let ids = |found: Vec<&Question>| found.iter().map(|q| q.id.to_string()).collect::<Vec<_>>();
        assert_eq!(ids(filter_questions(&list, "BORROW")), vec!["1"]);
        assert_eq!(ids(filter_questions(&list, "ferr")), vec!["2"]);
        assert_eq!(filter_questions(&list, "  ").len(), 2);
        assert!(filter_by_title(&list, "ferris").is_empty());
        assert_eq!(ids(filter_by_title(&list, "woes")), vec!["1"]);
    }

    #[test]
    fn first_five_tags_unless_expanded() {
        let tags: Vec<String> = (0..7).map(|i| format!("t{i}")).collect();
        assert_eq!(visible_tags(&tags, false).len(), 5);
        assert_eq!(visible_tags(&tags, true).len(), 7);
        assert_eq!(hidden_tag_count(&tags), 2);
        assert_eq!(hidden_tag_count(&tags[..3]), 0);
    }

    #[test]
    fn tag_input_is_trimmed_and_deduplicated() {
        assert_eq!(
            tags_from_input(" Rust, ,wasm,rust , Leptos"),
            vec!["Rust", "wasm", "Leptos"]
        );
        assert!(tags_from_input(" , ").is_empty());
    }

    #[test]
    fn badges_match_names_and_aliases() {
        assert_eq!(badge_logo(" ReactJS "), badge_logo("react.js"));
        assert_ne!(badge_logo("golang"), DEFAULT_BADGE_LOGO);
        assert_eq!(badge_logo("cobol"), DEFAULT_BADGE_LOGO);
    }
}

