//! Fixed trigger tables mapping test bodies and names to report text.
//!
//! Triggers are plain substring checks; `Act` also fires on `Actual`.

use crate::model::TestKind;

struct Trigger {
    needles: &'static [&'static str],
    text: &'static str,
}

impl Trigger {
    fn fires(&self, haystack: &str) -> bool {
        self.needles.iter().any(|n| haystack.contains(n))
    }
}

const UI_STEPS: &[Trigger] = &[
    Trigger { needles: &["Navigate().GoToUrl"], text: "1. Navigate to the target URL" },
    Trigger { needles: &["LoginAsStudent()"], text: "2. Login as student user" },
    Trigger { needles: &["FindElement"], text: "3. Locate required UI elements on the page" },
    Trigger { needles: &["SendKeys"], text: "4. Enter test data into input fields" },
    Trigger { needles: &["Click()"], text: "5. Click on interactive elements" },
    Trigger {
        needles: &["Window.Size"],
        text: "6. Change browser window size for responsive testing",
    },
    Trigger { needles: &["Assert"], text: "7. Verify expected results and element states" },
];

const UNIT_STEPS: &[Trigger] = &[
    Trigger { needles: &["new "], text: "1. Create test objects and initialize data" },
    Trigger { needles: &["Mock", "Setup"], text: "2. Setup mock objects and dependencies" },
    Trigger { needles: &["Act", "="], text: "3. Execute the method under test" },
    Trigger { needles: &["Assert"], text: "4. Verify the expected results" },
];

const UI_FALLBACK_STEPS: &[&str] = &["1. Execute test scenario", "2. Verify expected behavior"];

const UNIT_FALLBACK_STEPS: &[&str] =
    &["1. Setup test data", "2. Execute method", "3. Verify results"];

const UI_EXPECTED: &[Trigger] = &[
    Trigger { needles: &["ShouldLoad"], text: "Page loads successfully without errors" },
    Trigger {
        needles: &["ShouldDisplay"],
        text: "All specified UI elements are visible and properly displayed",
    },
    Trigger { needles: &["ShouldRedirect"], text: "User is redirected to the correct page/URL" },
    Trigger {
        needles: &["ShouldNavigate"],
        text: "Navigation functions correctly and reaches target destination",
    },
    Trigger { needles: &["ShouldAccept"], text: "Form accepts valid input data correctly" },
    Trigger { needles: &["ShouldValidate"], text: "Form validation works as expected" },
    Trigger {
        needles: &["ShouldShow", "ShouldHide"],
        text: "Element visibility toggles correctly",
    },
    Trigger {
        needles: &["Responsive"],
        text: "Page layout adapts properly to different screen sizes",
    },
    Trigger {
        needles: &["ShouldBeClickable"],
        text: "Element is clickable and functions correctly",
    },
];

const UNIT_EXPECTED: &[Trigger] = &[
    Trigger { needles: &["ShouldReturn"], text: "Method returns the expected value" },
    Trigger { needles: &["ShouldThrow"], text: "Method throws the expected exception" },
    Trigger { needles: &["ShouldCreate"], text: "Object is created successfully" },
    Trigger { needles: &["ShouldUpdate"], text: "Data is updated correctly" },
    Trigger { needles: &["ShouldDelete"], text: "Data is deleted successfully" },
];

pub const UI_EXPECTED_FALLBACK: &str = "Test completes successfully with all assertions passing";
pub const UNIT_EXPECTED_FALLBACK: &str = "Unit test passes with expected behavior";

/// One step per firing trigger in table order; never empty.
pub fn steps(kind: TestKind, body: &str) -> Vec<String> {
    let (table, fallback) = match kind {
        TestKind::Ui => (UI_STEPS, UI_FALLBACK_STEPS),
        TestKind::Unit => (UNIT_STEPS, UNIT_FALLBACK_STEPS),
    };

    let fired: Vec<String> = table
        .iter()
        .filter(|t| t.fires(body))
        .map(|t| t.text.to_string())
        .collect();

    if fired.is_empty() {
        fallback.iter().map(|s| s.to_string()).collect()
    } else {
        fired
    }
}

pub fn expected(kind: TestKind, name: &str) -> &'static str {
    let (table, fallback) = match kind {
        TestKind::Ui => (UI_EXPECTED, UI_EXPECTED_FALLBACK),
        TestKind::Unit => (UNIT_EXPECTED, UNIT_EXPECTED_FALLBACK),
    };

    table
        .iter()
        .find(|t| t.fires(name))
        .map(|t| t.text)
        .unwrap_or(fallback)
}

pub fn describe(name: &str) -> String {
    name.replace('_', " - ").replace("Should", "should")
}
