/// System prompt asking for a grouped, step-by-step test plan.
pub fn analysis_prompt(summary_json: &str, test_ids: &[String], attribute: &str) -> String {
    let ids_json = serde_json::to_string_pretty(test_ids).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"You are a highly experienced Senior QA Engineer. Given the extracted HTML information and a list of {attribute} attributes, your task is to create a detailed step-by-step test plan for this webpage. Group the test steps into separate test cases based on functionality.

Extracted HTML Information:
```json
{summary_json}
```

{attribute} Attributes:
```json
{ids_json}
```

Return the test plan in the following format:

```
Test Case: [Test Case Title]
1. [Action] on element with {attribute}="[{attribute}]" (Input: "[input_value]")
2. [Action] on element with {attribute}="[{attribute}]" (Expected Outcome: "[expected_outcome]")
...
```"#
    )
}

/// System prompt asking for a Playwright script implementing `test_steps`.
pub fn script_prompt(test_steps: &str, url: &str, attribute: &str) -> String {
    format!(
        r#"Generate a Playwright test script based on the following test steps. **Each Test Case should be a separate Playwright test function.** Use `getByTestId` to select elements. Provide specific assertions for each Expected Outcome. Ensure the URL is navigated to at the start of each test.

```
{test_steps}
```

Here's an example of how to translate a test step into Playwright code:

Test Step: Click on the "Submit" button with {attribute}="button-submit" (Expected Outcome: User is redirected to /dashboard)

Playwright Code:
```javascript
test('Submit Button Redirect', async ({{ page }}) => {{
    await page.goto('{url}');
    await page.getByTestId('button-submit').click();
    await expect(page).toHaveURL('/dashboard');
}});
```

Return only the Playwright test script. Do not include any explanatory text and without code block markdown."#
    )
}
