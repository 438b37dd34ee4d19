//! Built-in document templates and element palette snippets.
//!
//! Templates seed whole documents; snippets are the fragments the element
//! palette inserts at the caret. Which template was last used, and any other
//! persisted preference, is the host's concern.

/// A complete starter document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTemplate {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Abbreviated markup shown in the template picker.
    pub preview: &'static str,
    /// The full document text the template expands to.
    pub skeleton: &'static str,
}

/// Skeleton used for a bare "new document".
pub const NEW_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<pretext xmlns:xi="http://www.w3.org/2001/XInclude" xml:lang="en-US">
    <docinfo>
        <macros>
        \newcommand{\R}{\mathbb R}
        </macros>
    </docinfo>

    <book xml:id="new-book">
        <title>New PreTeXt Document</title>

        <chapter xml:id="ch-introduction">
            <title>Introduction</title>

            <section xml:id="sec-getting-started">
                <title>Getting Started</title>

                <p>
                    Start writing your content here.
                </p>

            </section>
        </chapter>
    </book>
</pretext>"#;

/// Look up a template by its identifier.
pub fn template(id: &str) -> Option<&'static DocumentTemplate> {
    builtin_templates().iter().find(|t| t.id == id)
}

pub fn builtin_templates() -> &'static [DocumentTemplate] {
    &[
        DocumentTemplate {
            id: "starter-book",
            label: "Book: Course Starter",
            description: "Structured for multi-chapter projects with docinfo macros and a ready-made introduction.",
            preview: r#"<book xml:id="course-book">
    <title>Course Title</title>
    <chapter xml:id="ch-introduction">…</chapter>
</book>"#,
            skeleton: r#"<?xml version="1.0" encoding="UTF-8"?>
<pretext xmlns:xi="http://www.w3.org/2001/XInclude" xml:lang="en-US">
    <docinfo>
        <macros>
        \newcommand{\R}{\mathbb R}
        </macros>
    </docinfo>

    <book xml:id="course-book">
        <title>Course Title</title>

        <chapter xml:id="ch-introduction">
            <title>Introduction</title>

            <section xml:id="sec-overview">
                <title>Overview</title>

                <p>
                    Describe the goals and structure of your course or text here.
                </p>

            </section>

            <section xml:id="sec-first-steps">
                <title>First Steps</title>

                <p>
                    Outline the first topic students should explore.
                </p>

            </section>
        </chapter>
    </book>
</pretext>"#,
        },
        DocumentTemplate {
            id: "concise-article",
            label: "Article: Concise Overview",
            description: "A streamlined article with two sections for quick notes or briefs.",
            preview: r#"<article xml:id="overview-article">
    <section xml:id="sec-introduction">…</section>
    <section xml:id="sec-summary">…</section>
</article>"#,
            skeleton: r#"<?xml version="1.0" encoding="UTF-8"?>
<pretext xmlns:xi="http://www.w3.org/2001/XInclude">
    <article xml:id="overview-article">
        <title>Concise Overview</title>

        <section xml:id="sec-introduction">
            <title>Introduction</title>
            <p>Use this space to introduce the main topic.</p>
            <p>Add supporting remarks with <em>emphasis</em> or inline <c>code</c> as needed.</p>
        </section>

        <section xml:id="sec-summary">
            <title>Summary</title>
            <p>Conclude your short article and reference earlier ideas with <xref ref="sec-introduction"/>.</p>
        </section>
    </article>
</pretext>"#,
        },
        DocumentTemplate {
            id: "math-forward-article",
            label: "Article: Math Forward",
            description: "Includes inline and display mathematics plus theorem-style structures.",
            preview: r#"<article xml:id="math-forward">
    <section xml:id="sec-basic-math">…</section>
    <theorem xml:id="thm-main">…</theorem>
</article>"#,
            skeleton: r#"<?xml version="1.0" encoding="UTF-8"?>
<pretext xmlns:xi="http://www.w3.org/2001/XInclude">
    <article xml:id="math-forward">
        <title>Mathematics Notes</title>

        <section xml:id="sec-basic-math">
            <title>Foundations</title>
            <p>Inline math: <m>x^2 + y^2 = z^2</m> and <m>\frac{1}{2}</m>.</p>
            <p>Display computation:</p>
            <me>\int_0^1 x^2 \, dx = \frac{1}{3}</me>
        </section>

        <section xml:id="sec-theorems">
            <title>Key Results</title>
            <definition xml:id="def-limit">
                <title>Limit</title>
                <statement>
                    <p>The limit of <m>f(x)</m> as <m>x</m> approaches <m>a</m> is <m>L</m> if:</p>
                    <me>\lim_{x \to a} f(x) = L</me>
                </statement>
            </definition>
            <theorem xml:id="thm-fundamental">
                <title>Fundamental Theorem of Calculus</title>
                <statement>
                    <p>If <m>f</m> is continuous on <m>[a,b]</m>, then:</p>
                    <me>\int_a^b f(x) \, dx = F(b) - F(a)</me>
                    <p>where <m>F'(x) = f(x)</m>.</p>
                </statement>
                <proof>
                    <p>Sketch the proof using supporting text or references.</p>
                </proof>
            </theorem>
        </section>
    </article>
</pretext>"#,
        },
        DocumentTemplate {
            id: "activity-handbook",
            label: "Activity & Exercises",
            description: "Starter layout for worksheets that combine examples with student tasks.",
            preview: r#"<article xml:id="activity-handbook">
    <example xml:id="ex-sample">…</example>
    <exercise xml:id="exr-practice">…</exercise>
</article>"#,
            skeleton: r#"<?xml version="1.0" encoding="UTF-8"?>
<pretext xmlns:xi="http://www.w3.org/2001/XInclude">
    <article xml:id="activity-handbook">
        <title>Activity Handbook</title>

        <section xml:id="sec-guided-example">
            <title>Guided Example</title>
            <example xml:id="ex-guided">
                <title>Working Example</title>
                <statement>
                    <p>Present a motivating problem or scenario.</p>
                </statement>
                <solution>
                    <p>Demonstrate the steps students should follow.</p>
                </solution>
            </example>
        </section>

        <section xml:id="sec-practice">
            <title>Practice</title>
            <exercise xml:id="exr-practice">
                <statement>
                    <p>Provide a related task for learners to attempt independently.</p>
                </statement>
                <hint>
                    <p>Offer a gentle hint or remove this element if not needed.</p>
                </hint>
                <solution>
                    <p>Summarize the expected reasoning or final answer.</p>
                </solution>
            </exercise>
        </section>
    </article>
</pretext>"#,
        },
    ]
}

/// Markup fragment inserted by the element palette, by element kind.
pub fn element_snippet(kind: &str) -> Option<&'static str> {
    let snippet = match kind {
        "book" => "<book xml:id=\"book-id\">\n    <title>Book Title</title>\n    <chapter xml:id=\"ch-1\">\n        <title>Chapter Title</title>\n        <p>Chapter content...</p>\n    </chapter>\n</book>",
        "article" => "<article xml:id=\"article-id\">\n    <title>Article Title</title>\n    <p>Article content...</p>\n</article>",
        "chapter" => "<chapter xml:id=\"ch-new\">\n    <title>Chapter Title</title>\n    <p>Chapter content...</p>\n</chapter>",
        "section" => "<section xml:id=\"sec-new\">\n    <title>Section Title</title>\n    <p>Section content...</p>\n</section>",
        "subsection" => "<subsection xml:id=\"subsec-new\">\n    <title>Subsection Title</title>\n    <p>Subsection content...</p>\n</subsection>",
        "p" => "<p>New paragraph text...</p>",
        "ol" => "<ol>\n    <li><p>First item</p></li>\n    <li><p>Second item</p></li>\n</ol>",
        "ul" => "<ul>\n    <li><p>First item</p></li>\n    <li><p>Second item</p></li>\n</ul>",
        "dl" => "<dl>\n    <li>\n        <title>Term</title>\n        <p>Definition</p>\n    </li>\n</dl>",
        "m" => "<m>x^2 + y^2 = z^2</m>",
        "me" => "<me>x = \\frac{-b \\pm \\sqrt{b^2 - 4ac}}{2a}</me>",
        "md" => "<md>\n    <mrow>f(x) &amp;= x^2 + 2x + 1</mrow>\n    <mrow>&amp;= (x + 1)^2</mrow>\n</md>",
        "theorem" => "<theorem xml:id=\"thm-new\">\n    <title>Theorem Title</title>\n    <statement>\n        <p>Theorem statement...</p>\n    </statement>\n    <proof>\n        <p>Proof...</p>\n    </proof>\n</theorem>",
        "definition" => "<definition xml:id=\"def-new\">\n    <title>Definition Title</title>\n    <statement>\n        <p>Definition statement...</p>\n    </statement>\n</definition>",
        "figure" => "<figure xml:id=\"fig-new\">\n    <caption>Figure Caption</caption>\n    <image source=\"path/to/image.png\" width=\"50%\"/>\n</figure>",
        "image" => "<image source=\"path/to/image.png\" width=\"50%\"/>",
        "video" => "<video xml:id=\"vid-new\" youtube=\"VIDEO_ID\"/>",
        _ => return None,
    };
    Some(snippet)
}
